//! MAC Scheduler Resource Grid Library
//!
//! This crate implements the time-frequency resource bookkeeping core of
//! the 5G NR MAC scheduler: per-slot occupancy grids across all active
//! numerologies of a cell, and the ring of future slot contexts the
//! scheduling policy allocates from (3GPP TS 38.211/38.214 timing model).
//!
//! The core is a single-writer data structure: one per-cell worker calls
//! [`cell::CellResourceAllocator::slot_indication`] once per slot boundary
//! and then reserves resources through the returned slot contexts. Invalid
//! use (out-of-range resources, inactive numerologies, out-of-order slot
//! indications) is a programming error and panics with a diagnostic; there
//! is no recoverable-error path on the scheduling hot path.

pub mod cell;
pub mod config;
pub mod result;

use thiserror::Error;

/// Errors raised while validating scheduler configuration
#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub use cell::{CarrierSubslotResourceGrid, CellResourceAllocator, CellSlotResourceGrid, SlotResourceGrid};
pub use config::{BwpConfiguration, CellConfiguration, DuplexMode, ScsSpecificCarrier, TddConfig};
pub use result::{GrantInfo, SchedulerSlotResult};
