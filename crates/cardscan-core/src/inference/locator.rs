//! Face locator model.
//!
//! A single-scale anchor-grid detector: a plain strided convolutional
//! backbone feeding a classification head and a box-regression head over a
//! 10x10 grid with two anchors per cell. Boxes are decoded as center offsets
//! relative to the anchor, then filtered with IoU-based non-maximum
//! suppression.

// Allow common ML code patterns
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

use anyhow::{Context, Result};
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{conv2d, Conv2d, Conv2dConfig, VarBuilder};

use super::sigmoid;

/// Input image size for the locator.
pub const INPUT_SIZE: usize = 160;

/// Feature grid side length after the backbone (160 / 2^4).
const GRID_SIZE: usize = 10;

/// Anchors per grid cell.
const ANCHORS_PER_CELL: usize = 2;

/// Total anchor count.
const NUM_ANCHORS: usize = GRID_SIZE * GRID_SIZE * ANCHORS_PER_CELL;

/// Confidence threshold below which anchors are discarded.
pub(crate) const DEFAULT_SCORE_THRESHOLD: f32 = 0.6;

/// IoU threshold for non-maximum suppression.
pub(crate) const DEFAULT_NMS_THRESHOLD: f32 = 0.35;

/// A located face in normalized `[0,1]` image coordinates.
#[derive(Debug, Clone, Copy)]
pub struct LocatedFace {
    /// Bounding box `[x_min, y_min, x_max, y_max]`, normalized.
    pub bbox: [f32; 4],
    /// Detection confidence.
    pub score: f32,
}

/// One backbone stage: stride-2 convolution plus ReLU.
struct DownBlock {
    conv: Conv2d,
}

impl DownBlock {
    fn new(in_channels: usize, out_channels: usize, vb: &VarBuilder) -> Result<Self> {
        let conv = conv2d(
            in_channels,
            out_channels,
            3,
            Conv2dConfig {
                stride: 2,
                padding: 1,
                ..Conv2dConfig::default()
            },
            vb.pp("conv"),
        )?;
        Ok(Self { conv })
    }
}

impl Module for DownBlock {
    fn forward(&self, x: &Tensor) -> candle_core::Result<Tensor> {
        self.conv.forward(x)?.relu()
    }
}

/// Anchor-grid face locator.
pub struct FaceLocator {
    backbone: Vec<DownBlock>,
    classifier: Conv2d,
    regressor: Conv2d,
    anchors: Vec<[f32; 2]>,
    score_threshold: f32,
    nms_threshold: f32,
    device: Device,
}

impl FaceLocator {
    /// Builds the locator from loaded weights.
    ///
    /// # Errors
    ///
    /// Returns an error if a weight tensor is missing or has the wrong shape.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let device = vb.device().clone();

        // 160 -> 80 -> 40 -> 20 -> 10
        let channels = [3usize, 16, 32, 64, 128];
        let mut backbone = Vec::with_capacity(channels.len() - 1);
        for (i, pair) in channels.windows(2).enumerate() {
            backbone.push(DownBlock::new(pair[0], pair[1], &vb.pp(format!("down.{i}")))?);
        }

        // One score per anchor, four box offsets per anchor.
        let classifier = conv2d(
            128,
            ANCHORS_PER_CELL,
            1,
            Conv2dConfig::default(),
            vb.pp("classifier"),
        )?;
        let regressor = conv2d(
            128,
            ANCHORS_PER_CELL * 4,
            1,
            Conv2dConfig::default(),
            vb.pp("regressor"),
        )?;

        Ok(Self {
            backbone,
            classifier,
            regressor,
            anchors: grid_anchors(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            nms_threshold: DEFAULT_NMS_THRESHOLD,
            device,
        })
    }

    /// Overrides the confidence threshold.
    #[must_use]
    pub const fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Overrides the NMS IoU threshold.
    #[must_use]
    pub const fn with_nms_threshold(mut self, threshold: f32) -> Self {
        self.nms_threshold = threshold;
        self
    }

    /// Scales an image to the locator input and normalizes it to `[-1, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if tensor creation fails.
    pub fn preprocess(&self, image: &image::DynamicImage) -> Result<Tensor> {
        let resized = image.resize_exact(
            INPUT_SIZE as u32,
            INPUT_SIZE as u32,
            image::imageops::FilterType::Triangle,
        );
        let rgb = resized.to_rgb8();

        let data: Vec<f32> = rgb
            .pixels()
            .flat_map(|p| {
                [
                    (f32::from(p[0]) / 127.5) - 1.0,
                    (f32::from(p[1]) / 127.5) - 1.0,
                    (f32::from(p[2]) / 127.5) - 1.0,
                ]
            })
            .collect();

        let tensor = Tensor::from_vec(data, (1, INPUT_SIZE, INPUT_SIZE, 3), &self.device)?;
        tensor
            .permute((0, 3, 1, 2))?
            .to_dtype(DType::F32)
            .context("Failed to preprocess locator input")
    }

    /// Runs the backbone and heads, returning per-anchor scores and boxes.
    fn forward(&self, x: &Tensor) -> Result<(Tensor, Tensor)> {
        let mut h = x.clone();
        for block in &self.backbone {
            h = block.forward(&h)?;
        }

        // (1, A, 10, 10) -> (1, 200, 1); (1, 4A, 10, 10) -> (1, 200, 4)
        let scores = self
            .classifier
            .forward(&h)?
            .permute((0, 2, 3, 1))?
            .reshape((1, NUM_ANCHORS, 1))?;
        let boxes = self
            .regressor
            .forward(&h)?
            .permute((0, 2, 3, 1))?
            .reshape((1, NUM_ANCHORS, 4))?;

        Ok((scores, boxes))
    }

    /// Locates faces in an image.
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails.
    pub fn locate(&self, image: &image::DynamicImage) -> Result<Vec<LocatedFace>> {
        let input = self.preprocess(image)?;
        let (scores, boxes) = self.forward(&input)?;
        self.decode(&scores, &boxes)
    }

    /// Decodes raw head output into located faces.
    fn decode(&self, scores: &Tensor, boxes: &Tensor) -> Result<Vec<LocatedFace>> {
        let scores = scores.squeeze(0)?.to_vec2::<f32>()?;
        let boxes = boxes.squeeze(0)?.to_vec2::<f32>()?;
        let size = INPUT_SIZE as f32;

        let mut faces = Vec::new();
        for (i, anchor) in self.anchors.iter().enumerate() {
            let score = sigmoid(scores[i][0]);
            if score < self.score_threshold {
                continue;
            }

            let offsets = &boxes[i];
            let cx = anchor[0] + offsets[0] / size;
            let cy = anchor[1] + offsets[1] / size;
            let w = offsets[2] / size;
            let h = offsets[3] / size;

            faces.push(LocatedFace {
                bbox: [
                    (cx - w / 2.0).clamp(0.0, 1.0),
                    (cy - h / 2.0).clamp(0.0, 1.0),
                    (cx + w / 2.0).clamp(0.0, 1.0),
                    (cy + h / 2.0).clamp(0.0, 1.0),
                ],
                score,
            });
        }

        Ok(nms(faces, self.nms_threshold))
    }
}

/// Anchor centers for the 10x10 grid, `ANCHORS_PER_CELL` per location.
fn grid_anchors() -> Vec<[f32; 2]> {
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);
    for y in 0..GRID_SIZE {
        for x in 0..GRID_SIZE {
            for _ in 0..ANCHORS_PER_CELL {
                anchors.push([
                    (x as f32 + 0.5) / GRID_SIZE as f32,
                    (y as f32 + 0.5) / GRID_SIZE as f32,
                ]);
            }
        }
    }
    anchors
}

/// Greedy non-maximum suppression, highest score first.
fn nms(mut faces: Vec<LocatedFace>, threshold: f32) -> Vec<LocatedFace> {
    faces.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep: Vec<LocatedFace> = Vec::new();
    for face in faces {
        if keep.iter().all(|k| iou(&k.bbox, &face.bbox) < threshold) {
            keep.push(face);
        }
    }
    keep
}

/// Intersection over union for two `[x_min, y_min, x_max, y_max]` boxes.
fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    let union = area_a + area_b - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_count() {
        assert_eq!(grid_anchors().len(), NUM_ANCHORS);
        assert_eq!(NUM_ANCHORS, 200);
    }

    #[test]
    fn test_anchors_inside_unit_square() {
        for anchor in grid_anchors() {
            assert!(anchor[0] > 0.0 && anchor[0] < 1.0);
            assert!(anchor[1] > 0.0 && anchor[1] < 1.0);
        }
    }

    #[test]
    fn test_iou_disjoint() {
        let a = [0.0, 0.0, 0.4, 0.4];
        let b = [0.5, 0.5, 1.0, 1.0];
        assert!(iou(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_iou_identical() {
        let a = [0.1, 0.1, 0.9, 0.9];
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_nms_suppresses_overlaps() {
        let strong = LocatedFace {
            bbox: [0.1, 0.1, 0.5, 0.5],
            score: 0.9,
        };
        let overlapping = LocatedFace {
            bbox: [0.12, 0.12, 0.52, 0.52],
            score: 0.7,
        };
        let distinct = LocatedFace {
            bbox: [0.6, 0.6, 0.9, 0.9],
            score: 0.8,
        };

        let kept = nms(vec![overlapping, strong, distinct], 0.35);
        assert_eq!(kept.len(), 2);
        assert!((kept[0].score - 0.9).abs() < 1e-6);
        assert!((kept[1].score - 0.8).abs() < 1e-6);
    }
}
