//! The image-to-annotation pipeline controller.
//!
//! Sequences one run from file selection through final status: readiness
//! gate, decode, detection, overlay rendering. Every stage catches its own
//! failure and converts it to a status message; nothing propagates uncaught
//! to the caller.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{DetectionResult, StatusMessage};
use crate::ports::{EngineProvider, FaceEngine, ImageDecoder, OverlaySurface, StatusSink};
use crate::session::{LoadState, RunState, Session};

/// Terminal outcome of one upload-to-result cycle.
///
/// Not-ready, busy, and zero-face runs are expected outcomes, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Rejected before decode: models are not ready.
    NotReady,
    /// Rejected before decode: a previous run is still executing.
    Busy,
    /// Decode or detection failed; the failure was surfaced as a status.
    Failed,
    /// Detection found no faces; the plain image is drawn, no overlay.
    NoFaces,
    /// Detection found faces and the overlay was rendered.
    Rendered(DetectionResult),
}

/// Pipeline controller owning the session state and the port collaborators.
///
/// Generic over the surface so callers keep access to the concrete canvas
/// after a run.
pub struct Pipeline<S: OverlaySurface> {
    provider: Box<dyn EngineProvider>,
    decoder: Box<dyn ImageDecoder>,
    surface: S,
    sink: Arc<dyn StatusSink>,
    engine: Option<Box<dyn FaceEngine>>,
    session: Session,
}

impl<S: OverlaySurface> Pipeline<S> {
    /// Creates a pipeline with models unloaded.
    pub fn new(
        provider: Box<dyn EngineProvider>,
        decoder: Box<dyn ImageDecoder>,
        surface: S,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            provider,
            decoder,
            surface,
            sink,
            engine: None,
            session: Session::new(),
        }
    }

    /// The session state (load/run machines, readiness, status slot).
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The current status slot value.
    #[must_use]
    pub const fn status(&self) -> &StatusMessage {
        self.session.status()
    }

    /// The drawing surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Loads the detection engine's assets.
    ///
    /// Readiness flips to true only after every asset loads; on failure the
    /// session parks in `LoadFailed` with no retry path, and later calls are
    /// no-ops. Returns whether the session is ready.
    pub fn load_models(&mut self) -> bool {
        if self.session.load_state() != LoadState::Unloaded {
            return self.session.model_ready();
        }

        self.session.begin_load();
        self.transition(StatusMessage::loading());

        match self.provider.load() {
            Ok(engine) => {
                info!("models loaded, pipeline ready");
                self.engine = Some(engine);
                self.session.mark_ready();
                self.transition(StatusMessage::loaded());
                true
            }
            Err(e) => {
                warn!("model loading failed: {e:#}");
                self.session.mark_load_failed();
                self.transition(StatusMessage::load_failed(format!("{e:#}")));
                false
            }
        }
    }

    /// Runs one upload-to-result cycle for the file at `path`.
    ///
    /// Stages run strictly in sequence, and each stage's status update is
    /// published before the next stage begins.
    pub fn process(&mut self, path: &Path) -> RunOutcome {
        if !self.session.model_ready() || self.engine.is_none() {
            self.transition(StatusMessage::not_ready());
            return RunOutcome::NotReady;
        }

        if !self.session.begin_run() {
            self.transition(StatusMessage::busy());
            return RunOutcome::Busy;
        }

        // Decoding
        let image = match self.decoder.decode(path) {
            Ok(image) => image,
            Err(e) => {
                warn!("decode failed for {}: {e:#}", path.display());
                return self.fail_run(&e);
            }
        };
        debug!(
            "decoded {} ({}x{})",
            image.path, image.width, image.height
        );

        // The plain image replaces whatever the surface showed before.
        if let Err(e) = self.surface.draw_image(&image) {
            return self.fail_run(&e);
        }

        // Detecting
        self.session.mark_detecting();
        self.transition(StatusMessage::detecting());

        let detected = match &self.engine {
            Some(engine) => engine.detect(&image),
            None => Err(anyhow::anyhow!("engine not loaded")),
        };
        let detections = match detected {
            Ok(detections) => detections,
            Err(e) => {
                // The original image stays drawn.
                warn!("detection failed for {}: {e:#}", image.path);
                return self.fail_run(&e);
            }
        };
        debug!("engine returned {} detection(s)", detections.len());

        if detections.is_empty() {
            self.session.finish_run(RunState::NoFaces);
            self.transition(StatusMessage::no_faces());
            return RunOutcome::NoFaces;
        }

        // Rendering: regions first, then landmarks, in engine order.
        if let Err(e) = self
            .surface
            .draw_regions(&detections)
            .and_then(|()| self.surface.draw_landmarks(&detections))
        {
            return self.fail_run(&e);
        }

        self.session.finish_run(RunState::Rendered);
        self.transition(StatusMessage::detected(detections.len()));
        RunOutcome::Rendered(detections)
    }

    /// Marks the active run failed and surfaces the cause.
    fn fail_run(&mut self, cause: &anyhow::Error) -> RunOutcome {
        self.session.finish_run(RunState::Failed);
        self.transition(StatusMessage::process_failed(format!("{cause:#}")));
        RunOutcome::Failed
    }

    /// Overwrites the status slot and notifies the sink.
    fn transition(&mut self, status: StatusMessage) {
        self.sink.publish(&status);
        self.session.set_status(status);
    }
}
