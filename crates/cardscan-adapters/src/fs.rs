//! Filesystem adapter for decoding uploaded images.

use std::path::Path;

use anyhow::{Context, Result};
use cardscan_core::{ImageDecoder, UploadedImage};
use tracing::debug;

/// Decodes image files from the local filesystem.
///
/// No extension allow-list: whatever the decoder accepts is authoritative,
/// and anything else surfaces as a decode error.
#[derive(Debug, Default)]
pub struct FsImageDecoder;

impl FsImageDecoder {
    /// Creates a new filesystem decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageDecoder for FsImageDecoder {
    fn decode(&self, path: &Path) -> Result<UploadedImage> {
        let image = image::open(path)
            .with_context(|| format!("Failed to decode image: {}", path.display()))?;

        let upload = UploadedImage::new(path.to_string_lossy().into_owned(), image);
        debug!(
            "decoded {} ({}x{})",
            upload.path, upload.width, upload.height
        );
        Ok(upload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_missing_file() {
        let decoder = FsImageDecoder::new();
        let result = decoder.decode(Path::new("/nonexistent/card.png"));
        assert!(result.is_err());
    }
}
