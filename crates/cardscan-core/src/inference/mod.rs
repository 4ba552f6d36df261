//! ML inference engine using Candle.
//!
//! Provides model loading and inference for:
//! - face localization (anchor-grid detector)
//! - 68-point facial landmarks

mod device;
mod engine;
mod landmarks;
mod loader;
mod locator;

pub use device::get_device;
pub use engine::{CandleEngineProvider, CandleFaceEngine, EngineConfig};
pub use landmarks::{LandmarkNet, CROP_SIZE};
pub use loader::load_safetensors;
pub use locator::{FaceLocator, LocatedFace, INPUT_SIZE};

/// Sigmoid activation function.
#[inline]
pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
