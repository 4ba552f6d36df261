//! Detection result types.

use serde::{Deserialize, Serialize};

/// Number of landmark points produced per detected face.
pub const LANDMARK_COUNT: usize = 68;

/// A 2D point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BoundingBox {
    /// Creates a new bounding box.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One located face: its bounding region plus 68 ordered landmark points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Face bounding region.
    pub region: BoundingBox,
    /// Ordered landmark points (`LANDMARK_COUNT` entries).
    pub landmarks: Vec<Point>,
    /// Detection confidence (0.0 to 1.0).
    pub confidence: f32,
}

impl Detection {
    /// Creates a new detection.
    #[must_use]
    pub const fn new(region: BoundingBox, landmarks: Vec<Point>, confidence: f32) -> Self {
        Self {
            region,
            landmarks,
            confidence,
        }
    }
}

/// Ordered sequence of detections for one run. Length zero is a normal,
/// reportable outcome rather than an error.
pub type DetectionResult = Vec<Detection>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_fields() {
        let bbox = BoundingBox::new(10, 20, 30, 40);
        assert_eq!(bbox.x, 10);
        assert_eq!(bbox.y, 20);
        assert_eq!(bbox.width, 30);
        assert_eq!(bbox.height, 40);
    }

    #[test]
    fn test_detection_holds_landmarks() {
        let landmarks: Vec<Point> = (0..LANDMARK_COUNT)
            .map(|i| Point::new(i as f32, i as f32))
            .collect();
        let det = Detection::new(BoundingBox::new(0, 0, 10, 10), landmarks, 0.9);
        assert_eq!(det.landmarks.len(), LANDMARK_COUNT);
    }
}
