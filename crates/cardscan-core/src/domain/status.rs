//! Pipeline status reporting types.

use serde::{Deserialize, Serialize};

/// Severity classification for a status message.
///
/// Drives presentation only; it carries no other behavior.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A stage is in progress.
    Info,
    /// A stage completed with a positive result.
    Success,
    /// An expected but noteworthy outcome (not ready, zero faces).
    Warning,
    /// A stage failed.
    Error,
}

/// The single user-visible feedback value. Overwritten, never appended, on
/// every phase transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Human-readable status text.
    pub text: String,
    /// Severity classification.
    pub severity: Severity,
}

impl StatusMessage {
    fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    /// Model loading has started.
    #[must_use]
    pub fn loading() -> Self {
        Self::new("Loading models...", Severity::Info)
    }

    /// Both model assets loaded successfully.
    #[must_use]
    pub fn loaded() -> Self {
        Self::new("All models loaded successfully", Severity::Success)
    }

    /// Model loading failed with the given cause.
    #[must_use]
    pub fn load_failed(cause: impl std::fmt::Display) -> Self {
        Self::new(format!("Error loading models: {cause}"), Severity::Error)
    }

    /// An upload was rejected because the models are not ready yet.
    #[must_use]
    pub fn not_ready() -> Self {
        Self::new("Please wait for models to load...", Severity::Warning)
    }

    /// An upload was rejected because another run is still active.
    #[must_use]
    pub fn busy() -> Self {
        Self::new("A scan is already in progress", Severity::Warning)
    }

    /// Detection is running.
    #[must_use]
    pub fn detecting() -> Self {
        Self::new("Detecting faces...", Severity::Info)
    }

    /// Detection finished without finding any face.
    #[must_use]
    pub fn no_faces() -> Self {
        Self::new("No faces detected in the ID card", Severity::Warning)
    }

    /// Detection finished with `count` faces, now rendered.
    #[must_use]
    pub fn detected(count: usize) -> Self {
        Self::new(
            format!("Detected {count} face(s) in the ID card"),
            Severity::Success,
        )
    }

    /// Decode or detection failed with the given cause.
    #[must_use]
    pub fn process_failed(cause: impl std::fmt::Display) -> Self {
        Self::new(format!("Error processing image: {cause}"), Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_count_in_text() {
        let status = StatusMessage::detected(2);
        assert_eq!(status.text, "Detected 2 face(s) in the ID card");
        assert_eq!(status.severity, Severity::Success);
    }

    #[test]
    fn test_failure_texts_carry_cause() {
        let status = StatusMessage::load_failed("timeout");
        assert_eq!(status.text, "Error loading models: timeout");
        assert_eq!(status.severity, Severity::Error);

        let status = StatusMessage::process_failed("corrupt file");
        assert_eq!(status.text, "Error processing image: corrupt file");
        assert_eq!(status.severity, Severity::Error);
    }

    #[test]
    fn test_expected_outcomes_are_warnings() {
        assert_eq!(StatusMessage::not_ready().severity, Severity::Warning);
        assert_eq!(StatusMessage::no_faces().severity, Severity::Warning);
        assert_eq!(StatusMessage::busy().severity, Severity::Warning);
    }
}
