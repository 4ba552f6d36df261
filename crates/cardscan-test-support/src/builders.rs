//! Synthetic card images and detection fixtures.

use cardscan_core::{BoundingBox, Detection, Point, UploadedImage, LANDMARK_COUNT};
use image::{DynamicImage, Rgb, RgbImage};

/// Builder for synthetic ID-card test images.
pub struct SyntheticCardBuilder;

impl SyntheticCardBuilder {
    /// A light card body on a dark backdrop, no face content.
    #[must_use]
    pub fn plain_card(width: u32, height: u32) -> UploadedImage {
        let margin_x = width / 10;
        let margin_y = height / 10;
        let img = RgbImage::from_fn(width, height, |x, y| {
            let on_card = x >= margin_x
                && x < width - margin_x
                && y >= margin_y
                && y < height - margin_y;
            if on_card {
                Rgb([235, 235, 225])
            } else {
                Rgb([40, 44, 52])
            }
        });
        UploadedImage::new("synthetic://plain_card", DynamicImage::ImageRgb8(img))
    }

    /// A card with a dark portrait block where a photo would sit.
    #[must_use]
    pub fn card_with_portrait(width: u32, height: u32) -> UploadedImage {
        let base = Self::plain_card(width, height);
        let mut img = base.image.to_rgb8();

        let px = width / 8;
        let py = height / 5;
        let pw = width / 4;
        let ph = height / 2;
        for y in py..(py + ph).min(height) {
            for x in px..(px + pw).min(width) {
                img.put_pixel(x, y, Rgb([120, 96, 84]));
            }
        }
        UploadedImage::new(
            "synthetic://card_with_portrait",
            DynamicImage::ImageRgb8(img),
        )
    }

    /// A uniform mid-gray image, useful where content is irrelevant.
    #[must_use]
    pub fn uniform(width: u32, height: u32) -> UploadedImage {
        let img = RgbImage::from_pixel(width, height, Rgb([128, 128, 128]));
        UploadedImage::new("synthetic://uniform", DynamicImage::ImageRgb8(img))
    }
}

/// A detection fixture at the given pixel region with 68 landmarks spread
/// across it in a deterministic grid.
#[must_use]
pub fn face_at(x: u32, y: u32, width: u32, height: u32) -> Detection {
    let landmarks = (0..LANDMARK_COUNT)
        .map(|i| {
            let col = (i % 10) as f32;
            let row = (i / 10) as f32;
            Point::new(
                x as f32 + col * width as f32 / 10.0,
                y as f32 + row * height as f32 / 7.0,
            )
        })
        .collect();
    Detection::new(BoundingBox::new(x, y, width, height), landmarks, 0.92)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_card_dimensions() {
        let card = SyntheticCardBuilder::plain_card(320, 200);
        assert_eq!(card.width, 320);
        assert_eq!(card.height, 200);
    }

    #[test]
    fn test_portrait_block_differs_from_card_body() {
        let card = SyntheticCardBuilder::card_with_portrait(320, 200);
        let rgb = card.image.to_rgb8();
        // Portrait block vs. card body.
        assert_ne!(rgb.get_pixel(60, 80), rgb.get_pixel(250, 100));
    }

    #[test]
    fn test_face_fixture_has_68_landmarks() {
        let det = face_at(10, 20, 50, 70);
        assert_eq!(det.landmarks.len(), LANDMARK_COUNT);
        assert_eq!(det.region, BoundingBox::new(10, 20, 50, 70));
        // All landmarks inside the region bounds.
        for p in &det.landmarks {
            assert!(p.x >= 10.0 && p.x <= 60.0);
            assert!(p.y >= 20.0 && p.y <= 90.0);
        }
    }
}
