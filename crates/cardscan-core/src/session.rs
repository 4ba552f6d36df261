//! Process-wide session state for the annotation pipeline.
//!
//! The session object replaces ambient globals: it owns the model readiness
//! flag, the current status slot, and the load/run state machines, and is
//! threaded explicitly through the pipeline controller.

use crate::domain::StatusMessage;

/// Model loading lifecycle.
///
/// `LoadFailed` is terminal for the session; there is no retry or reload
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Loading has not started.
    Unloaded,
    /// Asset loading is in progress.
    Loading,
    /// Both assets loaded; detection work may run.
    Ready,
    /// An asset failed to load. Terminal.
    LoadFailed,
}

/// Per-run lifecycle, reachable only once the session is `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run is active.
    Idle,
    /// The uploaded file is being decoded.
    Decoding,
    /// The detection engine is running.
    Detecting,
    /// The run finished with zero detections.
    NoFaces,
    /// The run finished with rendered overlays.
    Rendered,
    /// The run aborted at decode or detection.
    Failed,
}

impl RunState {
    /// Whether a stage of this run is still executing.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Decoding | Self::Detecting)
    }
}

/// Mutable session state owned by the pipeline controller.
#[derive(Debug)]
pub struct Session {
    load_state: LoadState,
    run_state: RunState,
    model_ready: bool,
    status: StatusMessage,
}

impl Session {
    /// Creates a fresh session: models unloaded, no run, load-start status.
    #[must_use]
    pub fn new() -> Self {
        Self {
            load_state: LoadState::Unloaded,
            run_state: RunState::Idle,
            model_ready: false,
            status: StatusMessage::loading(),
        }
    }

    /// Current model loading state.
    #[must_use]
    pub const fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Current per-run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Whether both model assets have loaded.
    #[must_use]
    pub const fn model_ready(&self) -> bool {
        self.model_ready
    }

    /// The current status slot value.
    #[must_use]
    pub const fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// Overwrites the status slot.
    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = status;
    }

    /// Unloaded -> Loading.
    pub fn begin_load(&mut self) {
        debug_assert_eq!(self.load_state, LoadState::Unloaded);
        self.load_state = LoadState::Loading;
    }

    /// Loading -> Ready. Flips the readiness flag; called at most once.
    pub fn mark_ready(&mut self) {
        debug_assert!(!self.model_ready);
        self.load_state = LoadState::Ready;
        self.model_ready = true;
    }

    /// Loading -> LoadFailed. Readiness stays false for the session.
    pub fn mark_load_failed(&mut self) {
        self.load_state = LoadState::LoadFailed;
    }

    /// Starts a new run, resetting any finished run back through Idle.
    ///
    /// Returns `false` without changing state when a previous run is still
    /// executing a stage; concurrent runs are rejected, never merged.
    pub fn begin_run(&mut self) -> bool {
        if self.run_state.is_active() {
            return false;
        }
        self.run_state = RunState::Decoding;
        true
    }

    /// Decoding -> Detecting.
    pub fn mark_detecting(&mut self) {
        debug_assert_eq!(self.run_state, RunState::Decoding);
        self.run_state = RunState::Detecting;
    }

    /// Marks the active run finished in the given terminal state.
    pub fn finish_run(&mut self, state: RunState) {
        debug_assert!(!state.is_active());
        self.run_state = state;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
