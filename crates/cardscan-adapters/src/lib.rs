//! Cardscan Adapters - External adapters for cardscan.
//!
//! This crate provides adapters for:
//! - Filesystem image decoding
//! - Raster overlay surface (image + imageproc)
//! - Model asset download and caching

pub mod fs;
pub mod models;
pub mod raster;

pub use fs::FsImageDecoder;
pub use models::{model_path, models_dir, set_models_dir};
pub use raster::RasterSurface;
