//! Detection engine ports.

use crate::domain::{Detection, UploadedImage};

/// Port for the face detection engine.
///
/// The pipeline treats the engine as opaque: it requests all detections with
/// landmarks in one call and interprets only the result shape. The order of
/// the returned sequence is whatever the engine provides.
pub trait FaceEngine: Send + Sync {
    /// Detects all faces with landmarks in the given image.
    ///
    /// An empty result is a normal outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    fn detect(&self, image: &UploadedImage) -> anyhow::Result<Vec<Detection>>;
}

/// Port for loading the detection engine's inference assets.
///
/// Readiness is all-or-nothing: `load` succeeds only once every required
/// asset is available, and no partial-readiness state is exposed.
pub trait EngineProvider: Send + Sync {
    /// Loads all required assets and returns a ready engine.
    ///
    /// # Errors
    ///
    /// Returns an error if any asset fails to load or parse.
    fn load(&self) -> anyhow::Result<Box<dyn FaceEngine>>;
}
