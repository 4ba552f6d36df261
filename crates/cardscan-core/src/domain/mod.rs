//! Core domain types for ID-card face annotation.

mod detection;
mod image_info;
mod status;

pub use detection::{BoundingBox, Detection, DetectionResult, Point, LANDMARK_COUNT};
pub use image_info::UploadedImage;
pub use status::{Severity, StatusMessage};
