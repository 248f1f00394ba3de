//! Resource Intervals
//!
//! Half-open `[start, stop)` integer ranges over OFDM symbols and common
//! resource blocks, the basic addressing units of the resource grid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Range of OFDM symbols within a slot, half-open `[start, stop)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OfdmSymbolRange {
    start: u8,
    stop: u8,
}

impl OfdmSymbolRange {
    /// Create a new symbol range. `start <= stop` is a hard precondition.
    pub fn new(start: u8, stop: u8) -> Self {
        assert!(
            start <= stop,
            "invalid symbol range [{}, {})",
            start,
            stop
        );
        Self { start, stop }
    }

    /// First symbol of the range
    pub fn start(&self) -> u8 {
        self.start
    }

    /// One past the last symbol of the range
    pub fn stop(&self) -> u8 {
        self.stop
    }

    /// Number of symbols in the range
    pub fn len(&self) -> u8 {
        self.stop - self.start
    }

    /// True if the range contains no symbols
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// True if the given symbol index falls within the range
    pub fn contains(&self, symbol: u8) -> bool {
        symbol >= self.start && symbol < self.stop
    }

    /// True if the two ranges share at least one symbol
    pub fn overlaps(&self, other: OfdmSymbolRange) -> bool {
        self.start < other.stop && other.start < self.stop
    }

    /// Iterate over the symbol indices of the range
    pub fn iter(&self) -> std::ops::Range<u8> {
        self.start..self.stop
    }
}

impl fmt::Display for OfdmSymbolRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}

/// Interval of common resource blocks, half-open `[start, stop)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrbInterval {
    start: u16,
    stop: u16,
}

impl CrbInterval {
    /// Create a new CRB interval. `start <= stop` is a hard precondition.
    pub fn new(start: u16, stop: u16) -> Self {
        assert!(start <= stop, "invalid CRB interval [{}, {})", start, stop);
        Self { start, stop }
    }

    /// First CRB of the interval
    pub fn start(&self) -> u16 {
        self.start
    }

    /// One past the last CRB of the interval
    pub fn stop(&self) -> u16 {
        self.stop
    }

    /// Number of CRBs in the interval
    pub fn len(&self) -> u16 {
        self.stop - self.start
    }

    /// True if the interval contains no CRBs
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }

    /// True if the given CRB falls within the interval
    pub fn contains(&self, crb: u16) -> bool {
        crb >= self.start && crb < self.stop
    }

    /// True if `other` lies fully within this interval
    pub fn contains_interval(&self, other: CrbInterval) -> bool {
        other.is_empty() || (other.start >= self.start && other.stop <= self.stop)
    }

    /// True if the two intervals share at least one CRB
    pub fn overlaps(&self, other: CrbInterval) -> bool {
        self.start < other.stop && other.start < self.stop
    }

    /// Intersection of the two intervals; empty when they do not overlap
    pub fn intersect(&self, other: CrbInterval) -> CrbInterval {
        let start = self.start.max(other.start);
        let stop = self.stop.min(other.stop);
        if start >= stop {
            CrbInterval::default()
        } else {
            CrbInterval::new(start, stop)
        }
    }

    /// Shift the interval by a signed RB offset. Both displaced endpoints
    /// must stay non-negative.
    pub fn displace(&self, offset: i32) -> CrbInterval {
        let start = self.start as i32 + offset;
        let stop = self.stop as i32 + offset;
        assert!(
            start >= 0 && stop >= 0,
            "CRB interval [{}, {}) displaced by {} underflows",
            self.start,
            self.stop,
            offset
        );
        CrbInterval::new(start as u16, stop as u16)
    }
}

impl fmt::Display for CrbInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.stop)
    }
}

/// Convert a CRB to a PRB local to the given BWP CRB limits
pub fn crb_to_prb(bwp_crb_lims: CrbInterval, crb: u16) -> u16 {
    assert!(
        bwp_crb_lims.contains(crb),
        "CRB {} outside BWP limits {}",
        crb,
        bwp_crb_lims
    );
    crb - bwp_crb_lims.start()
}

/// Convert a BWP-local PRB back to a CRB
pub fn prb_to_crb(bwp_crb_lims: CrbInterval, prb: u16) -> u16 {
    let crb = bwp_crb_lims.start() + prb;
    assert!(
        bwp_crb_lims.contains(crb),
        "PRB {} outside BWP limits {}",
        prb,
        bwp_crb_lims
    );
    crb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_range_basics() {
        let range = OfdmSymbolRange::new(2, 14);
        assert_eq!(range.len(), 12);
        assert!(!range.is_empty());
        assert!(range.contains(2));
        assert!(range.contains(13));
        assert!(!range.contains(14));

        let empty = OfdmSymbolRange::new(5, 5);
        assert!(empty.is_empty());
        assert!(!empty.contains(5));
    }

    #[test]
    fn test_symbol_range_overlap() {
        let a = OfdmSymbolRange::new(0, 2);
        let b = OfdmSymbolRange::new(2, 14);
        assert!(!a.overlaps(b));
        assert!(a.overlaps(OfdmSymbolRange::new(1, 3)));
    }

    #[test]
    #[should_panic]
    fn test_symbol_range_inverted() {
        let _ = OfdmSymbolRange::new(5, 2);
    }

    #[test]
    fn test_crb_interval_intersect() {
        let a = CrbInterval::new(10, 20);
        let b = CrbInterval::new(15, 30);
        assert_eq!(a.intersect(b), CrbInterval::new(15, 20));
        assert!(a.intersect(CrbInterval::new(20, 30)).is_empty());
    }

    #[test]
    fn test_crb_interval_displace() {
        let a = CrbInterval::new(10, 20);
        assert_eq!(a.displace(-10), CrbInterval::new(0, 10));
        assert_eq!(a.displace(5), CrbInterval::new(15, 25));
    }

    #[test]
    #[should_panic]
    fn test_crb_interval_displace_underflow() {
        let _ = CrbInterval::new(10, 20).displace(-11);
    }

    #[test]
    fn test_crb_prb_conversion() {
        let bwp = CrbInterval::new(10, 62);
        assert_eq!(crb_to_prb(bwp, 10), 0);
        assert_eq!(crb_to_prb(bwp, 61), 51);
        assert_eq!(prb_to_crb(bwp, 0), 10);
        assert_eq!(prb_to_crb(bwp, 51), 61);
    }
}
