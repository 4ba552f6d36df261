//! Inference device selection.

use candle_core::Device;
use tracing::debug;

/// Picks the inference device: GPU when compiled in and available, CPU
/// otherwise.
#[must_use]
pub fn get_device() -> Device {
    #[cfg(feature = "metal")]
    if let Ok(device) = Device::new_metal(0) {
        debug!("inference device: metal");
        return device;
    }

    #[cfg(feature = "cuda")]
    if let Ok(device) = Device::new_cuda(0) {
        debug!("inference device: cuda");
        return device;
    }

    debug!("inference device: cpu");
    Device::Cpu
}
