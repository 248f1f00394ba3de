//! Common Types and Primitives Library
//!
//! This crate provides the shared scheduling primitives used across the
//! MAC scheduler implementation: identifier types, half-open resource
//! intervals, slot timing arithmetic and bounded bitmaps.

pub mod bitmap;
pub mod interval;
pub mod slot_point;
pub mod types;

// Re-export commonly used items
pub use bitmap::Bitmap;
pub use interval::{crb_to_prb, prb_to_crb, CrbInterval, OfdmSymbolRange};
pub use slot_point::SlotPoint;
pub use types::*;
