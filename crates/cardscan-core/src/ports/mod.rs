//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the pipeline core and its
//! external collaborators: image decoding, the detection engine, the drawing
//! surface, and status presentation.

mod decoder;
mod engine;
mod status_sink;
mod surface;

pub use decoder::ImageDecoder;
pub use engine::{EngineProvider, FaceEngine};
pub use status_sink::StatusSink;
pub use surface::OverlaySurface;
