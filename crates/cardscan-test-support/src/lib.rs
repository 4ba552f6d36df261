//! Test support utilities for cardscan.
//!
//! Provides mocks for every pipeline port plus synthetic card images and
//! detection fixtures.
//!
//! # Example
//!
//! ```
//! use cardscan_test_support::{face_at, MockFaceEngine, SyntheticCardBuilder};
//!
//! let card = SyntheticCardBuilder::plain_card(320, 200);
//! let engine = MockFaceEngine::returning(vec![face_at(40, 30, 80, 100)]);
//! ```

mod builders;
mod mocks;

pub use builders::{face_at, SyntheticCardBuilder};
pub use mocks::{DrawCall, MockDecoder, MockEngineProvider, MockFaceEngine, MockStatusSink, MockSurface};
