//! Console status sink.

use cardscan_core::{Severity, StatusMessage, StatusSink};

/// A `StatusSink` that prints severity-tagged status lines to stderr.
///
/// Stdout is reserved for the JSON report, so status traffic goes to
/// stderr. Quiet mode drops informational lines but keeps warnings and
/// errors.
pub struct ConsoleStatus {
    quiet: bool,
}

impl ConsoleStatus {
    /// Creates a console sink; `quiet` suppresses info/success lines.
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

/// Short tag for a severity level.
fn label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Warning => "warn",
        _ => "error",
    }
}

impl StatusSink for ConsoleStatus {
    fn publish(&self, status: &StatusMessage) {
        if self.quiet && matches!(status.severity, Severity::Info | Severity::Success) {
            return;
        }
        eprintln!("[{}] {}", label(status.severity), status.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_severity() {
        assert_eq!(label(Severity::Info), "info");
        assert_eq!(label(Severity::Success), "ok");
        assert_eq!(label(Severity::Warning), "warn");
        assert_eq!(label(Severity::Error), "error");
    }
}
