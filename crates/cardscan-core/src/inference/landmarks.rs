//! 68-point facial landmark regressor.
//!
//! A small CNN over a grayscale face crop: four conv/max-pool stages and a
//! fully-connected head emitting 136 coordinates, normalized to the crop.
//! Callers map the output back into the face region in pixel space.

// Allow common ML/image code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

use anyhow::{Context, Result};
use candle_core::{Device, Module, Tensor};
use candle_nn::{conv2d, linear, Conv2d, Conv2dConfig, Linear, VarBuilder};

use crate::domain::{Point, LANDMARK_COUNT};

/// Side length of the square face crop fed to the regressor.
pub const CROP_SIZE: usize = 112;

/// 68-point landmark regression model.
pub struct LandmarkNet {
    conv1: Conv2d,
    conv2: Conv2d,
    conv3: Conv2d,
    conv4: Conv2d,
    fc1: Linear,
    fc2: Linear,
    device: Device,
}

impl LandmarkNet {
    /// Builds the regressor from loaded weights.
    ///
    /// # Errors
    ///
    /// Returns an error if a weight tensor is missing or has the wrong shape.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let device = vb.device().clone();

        let pad1 = Conv2dConfig {
            padding: 1,
            ..Conv2dConfig::default()
        };
        let conv1 = conv2d(1, 32, 3, pad1, vb.pp("conv1"))?;
        let conv2 = conv2d(32, 64, 3, pad1, vb.pp("conv2"))?;
        let conv3 = conv2d(64, 128, 3, pad1, vb.pp("conv3"))?;
        let conv4 = conv2d(128, 256, 3, pad1, vb.pp("conv4"))?;

        // Four 2x2 max pools: 112 -> 56 -> 28 -> 14 -> 7
        // Flattened: 256 * 7 * 7 = 12544
        let fc1 = linear(12544, 512, vb.pp("fc1"))?;
        let fc2 = linear(512, LANDMARK_COUNT * 2, vb.pp("fc2"))?;

        Ok(Self {
            conv1,
            conv2,
            conv3,
            conv4,
            fc1,
            fc2,
            device,
        })
    }

    /// Crops the face region from the image, resizes it to the net input,
    /// and normalizes the grayscale values to `[0, 1]`.
    ///
    /// The region is given as `[x_min, y_min, x_max, y_max]` in normalized
    /// image coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if tensor creation fails.
    pub fn preprocess(&self, image: &image::DynamicImage, region: &[f32; 4]) -> Result<Tensor> {
        let img_w = image.width() as f32;
        let img_h = image.height() as f32;

        let px = ((region[0] * img_w) as u32).min(image.width().saturating_sub(1));
        let py = ((region[1] * img_h) as u32).min(image.height().saturating_sub(1));
        let pw = (((region[2] - region[0]) * img_w) as u32)
            .min(image.width().saturating_sub(px))
            .max(1);
        let ph = (((region[3] - region[1]) * img_h) as u32)
            .min(image.height().saturating_sub(py))
            .max(1);

        let crop = image.crop_imm(px, py, pw, ph);
        let resized = crop.resize_exact(
            CROP_SIZE as u32,
            CROP_SIZE as u32,
            image::imageops::FilterType::Triangle,
        );
        let gray = resized.to_luma8();

        let data: Vec<f32> = gray.pixels().map(|p| f32::from(p[0]) / 255.0).collect();
        Tensor::from_vec(data, (1, 1, CROP_SIZE, CROP_SIZE), &self.device)
            .context("Failed to create landmark crop tensor")
    }

    /// Predicts the 68 landmark points for a face region, returning them in
    /// image pixel coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails.
    pub fn predict(&self, image: &image::DynamicImage, region: &[f32; 4]) -> Result<Vec<Point>> {
        let input = self.preprocess(image, region)?;
        let output = self.forward(&input)?;
        let coords = output.squeeze(0)?.to_vec1::<f32>()?;
        anyhow::ensure!(
            coords.len() == LANDMARK_COUNT * 2,
            "landmark head emitted {} values, expected {}",
            coords.len(),
            LANDMARK_COUNT * 2
        );

        Ok(map_to_image(&coords, region, image.width(), image.height()))
    }
}

/// Maps crop-normalized coordinate pairs into image pixel space.
fn map_to_image(coords: &[f32], region: &[f32; 4], img_w: u32, img_h: u32) -> Vec<Point> {
    let img_w = img_w as f32;
    let img_h = img_h as f32;
    let region_w = (region[2] - region[0]) * img_w;
    let region_h = (region[3] - region[1]) * img_h;
    let origin_x = region[0] * img_w;
    let origin_y = region[1] * img_h;

    coords
        .chunks_exact(2)
        .map(|pair| {
            Point::new(
                origin_x + pair[0].clamp(0.0, 1.0) * region_w,
                origin_y + pair[1].clamp(0.0, 1.0) * region_h,
            )
        })
        .collect()
}

impl Module for LandmarkNet {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        let x = self.conv1.forward(x)?.relu()?.max_pool2d(2)?;
        let x = self.conv2.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = self.conv3.forward(&x)?.relu()?.max_pool2d(2)?;
        let x = self.conv4.forward(&x)?.relu()?.max_pool2d(2)?;

        let x = x.flatten_from(1)?;
        let x = self.fc1.forward(&x)?.relu()?;
        self.fc2.forward(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fc_input_size() {
        // 112 -> 56 -> 28 -> 14 -> 7 after four 2x2 pools
        assert_eq!(CROP_SIZE / 2 / 2 / 2 / 2, 7);
        assert_eq!(256 * 7 * 7, 12544);
    }

    #[test]
    fn test_map_to_image_corners() {
        // Region covering the right half of a 200x100 image.
        let region = [0.5, 0.0, 1.0, 1.0];
        let coords = vec![0.0, 0.0, 1.0, 1.0];
        let points = map_to_image(&coords, &region, 200, 100);

        assert_eq!(points.len(), 2);
        assert!((points[0].x - 100.0).abs() < 1e-4);
        assert!((points[0].y - 0.0).abs() < 1e-4);
        assert!((points[1].x - 200.0).abs() < 1e-4);
        assert!((points[1].y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_map_to_image_clamps_overshoot() {
        let region = [0.0, 0.0, 0.5, 0.5];
        let coords = vec![1.5, -0.5];
        let points = map_to_image(&coords, &region, 100, 100);

        assert!((points[0].x - 50.0).abs() < 1e-4);
        assert!((points[0].y - 0.0).abs() < 1e-4);
    }
}
