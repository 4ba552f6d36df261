//! Image decoding port.

use std::path::Path;

use crate::domain::UploadedImage;

/// Port for turning a user-selected file into a decoded in-memory image.
///
/// No format allow-list is enforced here; whatever the decode step accepts
/// is authoritative, and any failure surfaces as a decode error.
pub trait ImageDecoder: Send + Sync {
    /// Decodes the file at `path` into pixel data with known dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or interpreted as an
    /// image.
    fn decode(&self, path: &Path) -> anyhow::Result<UploadedImage>;
}
