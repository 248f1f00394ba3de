//! Cell Resource Grids
//!
//! Per-cell time-frequency occupancy bookkeeping: the per-carrier bitmap
//! grids, their per-slot aggregation across active numerologies, and the
//! ring allocator that maps future slots to recycled grid instances.

pub mod allocator;
pub mod carrier_grid;
pub mod slot_grid;

// Re-export commonly used types
pub use allocator::CellResourceAllocator;
pub use carrier_grid::CarrierSubslotResourceGrid;
pub use slot_grid::{CellSlotResourceGrid, SlotResourceGrid};
