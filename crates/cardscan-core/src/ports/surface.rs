//! Drawing surface port.

use crate::domain::{Detection, UploadedImage};

/// Port for the 2D drawing surface the pipeline renders onto.
///
/// `draw_image` must resize the surface to the image's native pixel
/// dimensions and fully reset its contents, so a repeated render never
/// accumulates marks from a prior run.
pub trait OverlaySurface: Send {
    /// Redraws the source image at native dimensions, replacing all prior
    /// surface content.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be redrawn.
    fn draw_image(&mut self, image: &UploadedImage) -> anyhow::Result<()>;

    /// Draws the bounding region of each detection, in sequence order.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    fn draw_regions(&mut self, detections: &[Detection]) -> anyhow::Result<()>;

    /// Draws the landmark points of each detection, in sequence order.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    fn draw_landmarks(&mut self, detections: &[Detection]) -> anyhow::Result<()>;
}
