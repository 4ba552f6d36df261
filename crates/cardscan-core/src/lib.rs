//! Cardscan Core - Domain logic and the ID-card annotation pipeline
//!
//! This crate contains the core domain types, the port traits that decouple
//! the pipeline from its collaborators, the pipeline controller itself, and
//! the candle-based face locator / landmark inference engine.

pub mod domain;
pub mod inference;
pub mod pipeline;
pub mod ports;
pub mod session;

pub use domain::{
    BoundingBox, Detection, DetectionResult, Point, Severity, StatusMessage, UploadedImage,
    LANDMARK_COUNT,
};
pub use pipeline::{Pipeline, RunOutcome};
pub use ports::{EngineProvider, FaceEngine, ImageDecoder, OverlaySurface, StatusSink};
pub use session::{LoadState, RunState, Session};
