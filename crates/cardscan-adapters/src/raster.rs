//! Raster drawing surface backed by an in-memory RGB canvas.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

use std::path::Path;

use anyhow::{Context, Result};
use cardscan_core::{Detection, OverlaySurface, UploadedImage};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use tracing::debug;

/// Bounding region stroke color.
const REGION_COLOR: Rgb<u8> = Rgb([0, 140, 255]);
/// Landmark marker fill color.
const LANDMARK_COLOR: Rgb<u8> = Rgb([255, 64, 64]);
/// Landmark marker radius in pixels.
const LANDMARK_RADIUS: i32 = 2;

/// An `OverlaySurface` that rasterizes onto an `RgbImage`.
///
/// `draw_image` reallocates the canvas at the image's native dimensions, so
/// repeated renders always start from a clean copy of the source image.
#[derive(Debug, Default)]
pub struct RasterSurface {
    canvas: RgbImage,
}

impl RasterSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current canvas contents.
    #[must_use]
    pub const fn canvas(&self) -> &RgbImage {
        &self.canvas
    }

    /// Canvas dimensions `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    /// Writes the canvas to a file; format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.canvas
            .save(path)
            .with_context(|| format!("Failed to write annotated image: {}", path.display()))?;
        debug!("wrote annotated image to {}", path.display());
        Ok(())
    }
}

impl OverlaySurface for RasterSurface {
    fn draw_image(&mut self, image: &UploadedImage) -> Result<()> {
        // Full reset at native dimensions.
        self.canvas = image.image.to_rgb8();
        Ok(())
    }

    fn draw_regions(&mut self, detections: &[Detection]) -> Result<()> {
        for det in detections {
            let rect = Rect::at(det.region.x as i32, det.region.y as i32)
                .of_size(det.region.width.max(1), det.region.height.max(1));
            draw_hollow_rect_mut(&mut self.canvas, rect, REGION_COLOR);
        }
        Ok(())
    }

    fn draw_landmarks(&mut self, detections: &[Detection]) -> Result<()> {
        for det in detections {
            for point in &det.landmarks {
                draw_filled_circle_mut(
                    &mut self.canvas,
                    (point.x as i32, point.y as i32),
                    LANDMARK_RADIUS,
                    LANDMARK_COLOR,
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardscan_core::{BoundingBox, Point};

    fn upload(width: u32, height: u32) -> UploadedImage {
        UploadedImage::new(
            "synthetic://gray",
            image::DynamicImage::ImageRgb8(RgbImage::from_pixel(
                width,
                height,
                Rgb([128, 128, 128]),
            )),
        )
    }

    #[test]
    fn test_draw_image_resizes_canvas() {
        let mut surface = RasterSurface::new();
        assert_eq!(surface.dimensions(), (0, 0));

        surface.draw_image(&upload(64, 48)).unwrap();
        assert_eq!(surface.dimensions(), (64, 48));

        // A later upload with different dimensions replaces the canvas.
        surface.draw_image(&upload(32, 32)).unwrap();
        assert_eq!(surface.dimensions(), (32, 32));
    }

    #[test]
    fn test_regions_and_landmarks_change_pixels() {
        let mut surface = RasterSurface::new();
        surface.draw_image(&upload(64, 64)).unwrap();
        let plain = surface.canvas().clone();

        let det = Detection::new(
            BoundingBox::new(8, 8, 32, 32),
            vec![Point::new(20.0, 20.0)],
            0.9,
        );
        surface.draw_regions(std::slice::from_ref(&det)).unwrap();
        surface.draw_landmarks(std::slice::from_ref(&det)).unwrap();

        assert_ne!(surface.canvas().as_raw(), plain.as_raw());
        assert_eq!(*surface.canvas().get_pixel(8, 8), REGION_COLOR);
        assert_eq!(*surface.canvas().get_pixel(20, 20), LANDMARK_COLOR);
    }

    #[test]
    fn test_zero_sized_region_does_not_panic() {
        let mut surface = RasterSurface::new();
        surface.draw_image(&upload(16, 16)).unwrap();

        let det = Detection::new(BoundingBox::new(4, 4, 0, 0), vec![], 0.5);
        surface.draw_regions(&[det]).unwrap();
    }
}
