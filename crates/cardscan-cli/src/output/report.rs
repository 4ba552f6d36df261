//! JSON scan report.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use cardscan_core::Detection;
use serde::Serialize;

/// One scan's machine-readable result, written to stdout as a single JSON
/// object.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// Scanned image path.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Number of faces found.
    pub face_count: usize,
    /// Per-face regions, landmarks, and confidences.
    pub detections: Vec<Detection>,
}

impl ScanReport {
    /// Builds a report from a finished run.
    #[must_use]
    pub fn new(path: &Path, width: u32, height: u32, detections: &[Detection]) -> Self {
        Self {
            path: path.display().to_string(),
            width,
            height,
            face_count: detections.len(),
            detections: detections.to_vec(),
        }
    }

    /// Writes the report to stdout as one JSON line.
    pub fn print(&self) -> Result<()> {
        let json = serde_json::to_string(self)?;
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{json}")?;
        stdout.flush()?;
        Ok(())
    }
}
