//! Candle-backed detection engine and its asset provider.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use super::landmarks::LandmarkNet;
use super::loader::load_safetensors;
use super::locator::{FaceLocator, DEFAULT_NMS_THRESHOLD, DEFAULT_SCORE_THRESHOLD};
use super::{get_device, LocatedFace};
use crate::domain::{BoundingBox, Detection, UploadedImage};
use crate::ports::{EngineProvider, FaceEngine};

/// Tunables for the candle engine.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Minimum detection confidence.
    pub score_threshold: f32,
    /// IoU threshold for non-maximum suppression.
    pub nms_threshold: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            nms_threshold: DEFAULT_NMS_THRESHOLD,
        }
    }
}

/// Face detection engine running the locator and the landmark regressor.
pub struct CandleFaceEngine {
    locator: FaceLocator,
    landmarks: LandmarkNet,
}

impl CandleFaceEngine {
    /// Wraps already-loaded models into an engine.
    #[must_use]
    pub const fn new(locator: FaceLocator, landmarks: LandmarkNet) -> Self {
        Self { locator, landmarks }
    }

    fn to_detection(&self, image: &UploadedImage, face: &LocatedFace) -> Result<Detection> {
        let landmarks = self.landmarks.predict(&image.image, &face.bbox)?;

        let img_w = image.width as f32;
        let img_h = image.height as f32;
        let region = BoundingBox::new(
            (face.bbox[0] * img_w) as u32,
            (face.bbox[1] * img_h) as u32,
            ((face.bbox[2] - face.bbox[0]) * img_w) as u32,
            ((face.bbox[3] - face.bbox[1]) * img_h) as u32,
        );

        Ok(Detection::new(region, landmarks, face.score))
    }
}

impl FaceEngine for CandleFaceEngine {
    fn detect(&self, image: &UploadedImage) -> Result<Vec<Detection>> {
        let faces = self
            .locator
            .locate(&image.image)
            .context("Face localization failed")?;
        debug!("locator found {} candidate face(s)", faces.len());

        faces
            .iter()
            .map(|face| self.to_detection(image, face))
            .collect()
    }
}

/// Loads the two engine assets from their configured file locations.
///
/// Loading is all-or-nothing: both the locator and the landmark weights must
/// load before an engine is handed out.
pub struct CandleEngineProvider {
    locator_path: PathBuf,
    landmarks_path: PathBuf,
    config: EngineConfig,
}

impl CandleEngineProvider {
    /// Creates a provider for the given asset paths.
    #[must_use]
    pub fn new(locator_path: impl Into<PathBuf>, landmarks_path: impl Into<PathBuf>) -> Self {
        Self {
            locator_path: locator_path.into(),
            landmarks_path: landmarks_path.into(),
            config: EngineConfig::default(),
        }
    }

    /// Overrides the engine tunables.
    #[must_use]
    pub const fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }
}

impl EngineProvider for CandleEngineProvider {
    fn load(&self) -> Result<Box<dyn FaceEngine>> {
        let device = get_device();

        debug!("loading face locator from {}", self.locator_path.display());
        let vb = load_safetensors(&self.locator_path, &device)
            .context("Failed to load face locator weights")?;
        let locator = FaceLocator::new(vb)
            .context("Failed to build face locator")?
            .with_score_threshold(self.config.score_threshold)
            .with_nms_threshold(self.config.nms_threshold);

        debug!(
            "loading landmark model from {}",
            self.landmarks_path.display()
        );
        let vb = load_safetensors(&self.landmarks_path, &device)
            .context("Failed to load landmark weights")?;
        let landmarks = LandmarkNet::new(vb).context("Failed to build landmark model")?;

        Ok(Box::new(CandleFaceEngine::new(locator, landmarks)))
    }
}
