//! Slot Point
//!
//! A `SlotPoint` identifies one slot on the radio timeline of a given
//! numerology. It wraps a slot counter over the 1024-frame hyperframe
//! (3GPP TS 38.211) and supports wraparound-safe modular arithmetic.
//! Slot points of different numerologies count slots of different
//! durations and are therefore not directly comparable.

use crate::types::{SubcarrierSpacing, NOF_SFNS, NOF_SUBFRAMES_PER_FRAME};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Slot identifier: numerology plus a wrapping slot counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotPoint {
    /// Numerology index mu (0..4)
    numerology: u8,
    /// Slot count within the hyperframe, in `[0, 10240 * 2^mu)`
    count: u32,
}

impl SlotPoint {
    /// Create a slot point from a raw slot count. Counts beyond the
    /// hyperframe length wrap around.
    pub fn new(scs: SubcarrierSpacing, count: u32) -> Self {
        let numerology = scs.to_numerology();
        let period = nof_slots_per_hyper_frame(numerology);
        Self {
            numerology,
            count: count % period,
        }
    }

    /// Create a slot point from an SFN and a slot index within the frame
    pub fn from_sfn_slot(scs: SubcarrierSpacing, sfn: u32, slot_index: u32) -> Self {
        let numerology = scs.to_numerology();
        let per_frame = nof_slots_per_frame(numerology);
        assert!(sfn < NOF_SFNS, "SFN {} out of range", sfn);
        assert!(
            slot_index < per_frame,
            "slot index {} out of range for numerology {}",
            slot_index,
            numerology
        );
        Self {
            numerology,
            count: sfn * per_frame + slot_index,
        }
    }

    /// Numerology index mu of this slot point
    pub fn numerology(&self) -> u8 {
        self.numerology
    }

    /// Subcarrier spacing of this slot point
    pub fn scs(&self) -> SubcarrierSpacing {
        match SubcarrierSpacing::from_numerology(self.numerology) {
            Some(scs) => scs,
            None => unreachable!("slot point holds invalid numerology"),
        }
    }

    /// Raw slot count within the hyperframe, used for ring indexing
    pub fn to_uint(&self) -> u32 {
        self.count
    }

    /// System frame number of this slot
    pub fn sfn(&self) -> u32 {
        self.count / nof_slots_per_frame(self.numerology)
    }

    /// Slot index within the radio frame
    pub fn slot_index(&self) -> u32 {
        self.count % nof_slots_per_frame(self.numerology)
    }

    /// Number of slots per radio frame for this numerology
    pub fn nof_slots_per_frame(&self) -> u32 {
        nof_slots_per_frame(self.numerology)
    }

    /// Number of slots in the full hyperframe for this numerology
    pub fn nof_slots_per_hyper_frame(&self) -> u32 {
        nof_slots_per_hyper_frame(self.numerology)
    }
}

fn nof_slots_per_frame(numerology: u8) -> u32 {
    NOF_SUBFRAMES_PER_FRAME << numerology
}

fn nof_slots_per_hyper_frame(numerology: u8) -> u32 {
    NOF_SFNS * nof_slots_per_frame(numerology)
}

impl Add<u32> for SlotPoint {
    type Output = SlotPoint;

    fn add(self, rhs: u32) -> SlotPoint {
        let period = nof_slots_per_hyper_frame(self.numerology);
        SlotPoint {
            numerology: self.numerology,
            count: (self.count + rhs % period) % period,
        }
    }
}

impl AddAssign<u32> for SlotPoint {
    fn add_assign(&mut self, rhs: u32) {
        *self = *self + rhs;
    }
}

impl Sub<u32> for SlotPoint {
    type Output = SlotPoint;

    fn sub(self, rhs: u32) -> SlotPoint {
        let period = nof_slots_per_hyper_frame(self.numerology);
        SlotPoint {
            numerology: self.numerology,
            count: (self.count + period - rhs % period) % period,
        }
    }
}

impl SubAssign<u32> for SlotPoint {
    fn sub_assign(&mut self, rhs: u32) {
        *self = *self - rhs;
    }
}

impl Sub<SlotPoint> for SlotPoint {
    type Output = i32;

    /// Signed shortest slot distance between two slot points of the same
    /// numerology, accounting for hyperframe wraparound.
    fn sub(self, rhs: SlotPoint) -> i32 {
        assert_eq!(
            self.numerology, rhs.numerology,
            "slot distance across numerologies is undefined"
        );
        let period = nof_slots_per_hyper_frame(self.numerology);
        let diff = (self.count + period - rhs.count) % period;
        if diff > period / 2 {
            diff as i32 - period as i32
        } else {
            diff as i32
        }
    }
}

impl PartialOrd for SlotPoint {
    /// Ordering by signed wraparound distance, defined only within one
    /// numerology.
    fn partial_cmp(&self, other: &SlotPoint) -> Option<Ordering> {
        if self.numerology != other.numerology {
            return None;
        }
        Some((*self - *other).cmp(&0))
    }
}

impl fmt::Display for SlotPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.sfn(), self.slot_index())
    }
}
