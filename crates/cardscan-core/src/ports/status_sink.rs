//! Status presentation port.

use crate::domain::StatusMessage;

/// Port for observing the pipeline's single status slot.
///
/// Called synchronously at each phase boundary with the new current value.
/// Presentation only; the pipeline keeps the authoritative slot itself.
pub trait StatusSink: Send + Sync {
    /// Called when the current status is overwritten.
    fn publish(&self, status: &StatusMessage);
}
