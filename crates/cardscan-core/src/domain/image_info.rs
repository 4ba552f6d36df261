//! Uploaded image data.

use image::GenericImageView;

/// A decoded upload with known pixel dimensions.
///
/// One value is live per run; the next upload supersedes it.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Where the image came from (path or synthetic identifier).
    pub path: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Decoded pixel data.
    pub image: image::DynamicImage,
}

impl UploadedImage {
    /// Creates an `UploadedImage` from a decoded image, extracting dimensions.
    #[must_use]
    pub fn new(path: impl Into<String>, image: image::DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            path: path.into(),
            width,
            height,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_extracted() {
        let img = image::DynamicImage::new_rgb8(320, 200);
        let upload = UploadedImage::new("card.png", img);
        assert_eq!(upload.width, 320);
        assert_eq!(upload.height, 200);
        assert_eq!(upload.path, "card.png");
    }
}
