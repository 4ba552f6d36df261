//! Mock implementations of the pipeline port traits.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use cardscan_core::{
    Detection, EngineProvider, FaceEngine, ImageDecoder, OverlaySurface, StatusMessage,
    StatusSink, UploadedImage,
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock `FaceEngine` returning a canned result and counting invocations.
#[derive(Clone)]
pub struct MockFaceEngine {
    result: Arc<Mutex<Result<Vec<Detection>, String>>>,
    detect_count: Arc<Mutex<usize>>,
}

impl MockFaceEngine {
    /// An engine that yields the given detections on every call.
    #[must_use]
    pub fn returning(detections: Vec<Detection>) -> Self {
        Self {
            result: Arc::new(Mutex::new(Ok(detections))),
            detect_count: Arc::new(Mutex::new(0)),
        }
    }

    /// An engine whose `detect` fails with the given message.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: Arc::new(Mutex::new(Err(message.into()))),
            detect_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of times `detect` was called.
    #[must_use]
    pub fn detect_count(&self) -> usize {
        *lock(&self.detect_count)
    }
}

impl FaceEngine for MockFaceEngine {
    fn detect(&self, _image: &UploadedImage) -> anyhow::Result<Vec<Detection>> {
        *lock(&self.detect_count) += 1;
        match &*lock(&self.result) {
            Ok(detections) => Ok(detections.clone()),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}

/// Mock `EngineProvider` that hands out a mock engine or fails.
pub struct MockEngineProvider {
    outcome: Result<MockFaceEngine, String>,
    load_count: Arc<Mutex<usize>>,
}

impl MockEngineProvider {
    /// A provider that yields the given engine.
    #[must_use]
    pub fn ready(engine: MockFaceEngine) -> Self {
        Self {
            outcome: Ok(engine),
            load_count: Arc::new(Mutex::new(0)),
        }
    }

    /// A provider whose `load` fails with the given cause.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            load_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of times `load` was called.
    #[must_use]
    pub fn load_count(&self) -> usize {
        *lock(&self.load_count)
    }
}

impl EngineProvider for MockEngineProvider {
    fn load(&self) -> anyhow::Result<Box<dyn FaceEngine>> {
        *lock(&self.load_count) += 1;
        match &self.outcome {
            Ok(engine) => Ok(Box::new(engine.clone())),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}

/// Mock `ImageDecoder` yielding a fixture image or a decode failure.
pub struct MockDecoder {
    outcome: Result<UploadedImage, String>,
    decode_count: Arc<Mutex<usize>>,
}

impl MockDecoder {
    /// A decoder that yields the given image for any path.
    #[must_use]
    pub fn returning(image: UploadedImage) -> Self {
        Self {
            outcome: Ok(image),
            decode_count: Arc::new(Mutex::new(0)),
        }
    }

    /// A decoder whose `decode` fails with the given cause.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            decode_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of times `decode` was called.
    #[must_use]
    pub fn decode_count(&self) -> usize {
        *lock(&self.decode_count)
    }

    /// A shared handle for asserting after the decoder moves into the
    /// pipeline.
    #[must_use]
    pub fn counter(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.decode_count)
    }
}

impl ImageDecoder for MockDecoder {
    fn decode(&self, _path: &Path) -> anyhow::Result<UploadedImage> {
        *lock(&self.decode_count) += 1;
        match &self.outcome {
            Ok(image) => Ok(image.clone()),
            Err(message) => Err(anyhow::anyhow!("{message}")),
        }
    }
}

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    /// The plain image was drawn at the given dimensions.
    Image {
        /// Canvas width after the redraw.
        width: u32,
        /// Canvas height after the redraw.
        height: u32,
    },
    /// Bounding regions were drawn for this many detections.
    Regions(usize),
    /// Landmark sets were drawn for this many detections.
    Landmarks(usize),
}

/// Mock `OverlaySurface` that records draw calls.
///
/// `draw_image` clears the recorded state first, mirroring the full-reset
/// redraw contract, while a cumulative counter tracks every image draw.
#[derive(Default)]
pub struct MockSurface {
    calls: Vec<DrawCall>,
    total_image_draws: usize,
}

impl MockSurface {
    /// Creates an empty mock surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The surface state as a sequence of draw calls since the last full
    /// redraw.
    #[must_use]
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Total `draw_image` invocations, across resets.
    #[must_use]
    pub const fn total_image_draws(&self) -> usize {
        self.total_image_draws
    }

    /// Whether any overlay (regions or landmarks) is currently drawn.
    #[must_use]
    pub fn has_overlay(&self) -> bool {
        self.calls
            .iter()
            .any(|c| matches!(c, DrawCall::Regions(_) | DrawCall::Landmarks(_)))
    }
}

impl OverlaySurface for MockSurface {
    fn draw_image(&mut self, image: &UploadedImage) -> anyhow::Result<()> {
        self.calls.clear();
        self.calls.push(DrawCall::Image {
            width: image.width,
            height: image.height,
        });
        self.total_image_draws += 1;
        Ok(())
    }

    fn draw_regions(&mut self, detections: &[Detection]) -> anyhow::Result<()> {
        self.calls.push(DrawCall::Regions(detections.len()));
        Ok(())
    }

    fn draw_landmarks(&mut self, detections: &[Detection]) -> anyhow::Result<()> {
        self.calls.push(DrawCall::Landmarks(detections.len()));
        Ok(())
    }
}

/// Mock `StatusSink` capturing every published status.
#[derive(Default)]
pub struct MockStatusSink {
    messages: Arc<Mutex<Vec<StatusMessage>>>,
}

impl MockStatusSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured statuses, in publish order.
    #[must_use]
    pub fn messages(&self) -> Vec<StatusMessage> {
        lock(&self.messages).clone()
    }

    /// The most recently published status, if any.
    #[must_use]
    pub fn last(&self) -> Option<StatusMessage> {
        lock(&self.messages).last().cloned()
    }

    /// The captured status texts, in publish order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        lock(&self.messages).iter().map(|m| m.text.clone()).collect()
    }
}

impl StatusSink for MockStatusSink {
    fn publish(&self, status: &StatusMessage) {
        lock(&self.messages).push(status.clone());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::builders::{face_at, SyntheticCardBuilder};

    #[test]
    fn test_mock_engine_counts_calls() {
        let engine = MockFaceEngine::returning(vec![face_at(0, 0, 10, 10)]);
        let image = SyntheticCardBuilder::uniform(32, 32);

        assert_eq!(engine.detect(&image).unwrap().len(), 1);
        assert_eq!(engine.detect(&image).unwrap().len(), 1);
        assert_eq!(engine.detect_count(), 2);
    }

    #[test]
    fn test_mock_engine_failure() {
        let engine = MockFaceEngine::failing("inference blew up");
        let image = SyntheticCardBuilder::uniform(32, 32);

        let err = engine.detect(&image).unwrap_err();
        assert_eq!(err.to_string(), "inference blew up");
        assert_eq!(engine.detect_count(), 1);
    }

    #[test]
    fn test_mock_surface_resets_on_image_draw() {
        let mut surface = MockSurface::new();
        let image = SyntheticCardBuilder::uniform(64, 48);

        surface.draw_image(&image).unwrap();
        surface.draw_regions(&[face_at(0, 0, 10, 10)]).unwrap();
        assert!(surface.has_overlay());

        surface.draw_image(&image).unwrap();
        assert!(!surface.has_overlay());
        assert_eq!(surface.total_image_draws(), 2);
        assert_eq!(
            surface.calls(),
            &[DrawCall::Image {
                width: 64,
                height: 48
            }]
        );
    }

    #[test]
    fn test_mock_status_sink_captures_in_order() {
        let sink = MockStatusSink::new();
        sink.publish(&StatusMessage::loading());
        sink.publish(&StatusMessage::loaded());

        assert_eq!(
            sink.texts(),
            vec!["Loading models...", "All models loaded successfully"]
        );
        assert_eq!(sink.last().unwrap(), StatusMessage::loaded());
    }
}
