//! Carrier Resource Grid
//!
//! Bit-level occupancy storage for one carrier (one subcarrier spacing)
//! across the OFDM symbols of a single slot. Each bit answers "is this
//! (symbol, RB) pair reserved". All public operations take CRBs and
//! displace them by the carrier offset into carrier-local RB positions.
//!
//! Out-of-range symbols or CRBs are contract violations and panic; the
//! scheduling policy validates its inputs before reaching this layer.

use crate::config::ScsSpecificCarrier;
use common::types::{SubcarrierSpacing, MAX_NOF_PRBS, NOF_OFDM_SYM_PER_SLOT};
use common::{Bitmap, CrbInterval, OfdmSymbolRange};

/// Occupancy bitmap of one carrier over one slot
#[derive(Debug, Clone)]
pub struct CarrierSubslotResourceGrid {
    /// Subcarrier spacing of the carrier
    scs: SubcarrierSpacing,
    /// Offset in CRBs from point A to the first carrier RB
    offset: u16,
    /// Carrier bandwidth in RBs
    bandwidth: u16,
    /// `NOF_OFDM_SYM_PER_SLOT * bandwidth` bits, symbol-major
    bits: Bitmap,
}

impl CarrierSubslotResourceGrid {
    /// Create an all-free grid for the given carrier
    pub fn new(carrier: ScsSpecificCarrier) -> Self {
        Self {
            scs: carrier.scs,
            offset: carrier.offset_to_carrier,
            bandwidth: carrier.carrier_bandwidth,
            bits: Bitmap::new(NOF_OFDM_SYM_PER_SLOT as usize * carrier.carrier_bandwidth as usize),
        }
    }

    /// Subcarrier spacing of the carrier
    pub fn scs(&self) -> SubcarrierSpacing {
        self.scs
    }

    /// Carrier offset in CRBs
    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Carrier bandwidth in RBs
    pub fn nof_rbs(&self) -> u16 {
        self.bandwidth
    }

    /// CRB interval covered by the carrier
    pub fn rb_dims(&self) -> CrbInterval {
        CrbInterval::new(self.offset, self.offset + self.bandwidth)
    }

    /// Reset every bit to unreserved
    pub fn clear(&mut self) {
        self.bits.reset();
    }

    /// Reserve the rectangle `symbols x crbs`. Does not check prior
    /// occupancy; callers use `collides` first when overlap matters.
    pub fn fill(&mut self, symbols: OfdmSymbolRange, crbs: CrbInterval) {
        let local = self.to_carrier_local(crbs);
        self.check_symbols(symbols);
        for symbol in symbols.iter() {
            let row = self.row_offset(symbol);
            self.bits
                .set_range(row + local.start() as usize, row + local.stop() as usize);
        }
    }

    /// Sparse-list variant of `fill` for non-contiguous allocations
    /// (e.g. frequency-hopped PUCCH)
    pub fn fill_list(&mut self, symbols: OfdmSymbolRange, crbs: &[u16]) {
        self.check_symbols(symbols);
        for &crb in crbs {
            let rb = self.to_carrier_local_rb(crb);
            for symbol in symbols.iter() {
                let pos = self.row_offset(symbol) + rb;
                self.bits.set(pos);
            }
        }
    }

    /// True if any bit in the rectangle `symbols x crbs` is reserved
    pub fn collides(&self, symbols: OfdmSymbolRange, crbs: CrbInterval) -> bool {
        let local = self.to_carrier_local(crbs);
        self.check_symbols(symbols);
        symbols.iter().any(|symbol| {
            let row = self.row_offset(symbol);
            self.bits
                .any_in_range(row + local.start() as usize, row + local.stop() as usize)
        })
    }

    /// Sparse-list variant of `collides`
    pub fn collides_list(&self, symbols: OfdmSymbolRange, crbs: &[u16]) -> bool {
        self.check_symbols(symbols);
        crbs.iter().any(|&crb| {
            let rb = self.to_carrier_local_rb(crb);
            symbols
                .iter()
                .any(|symbol| self.bits.test(self.row_offset(symbol) + rb))
        })
    }

    /// True only if every bit in the rectangle is reserved
    pub fn all_set(&self, symbols: OfdmSymbolRange, crbs: CrbInterval) -> bool {
        let local = self.to_carrier_local(crbs);
        self.check_symbols(symbols);
        symbols.iter().all(|symbol| {
            let row = self.row_offset(symbol);
            self.bits
                .all_in_range(row + local.start() as usize, row + local.stop() as usize)
        })
    }

    /// Fold the per-symbol occupancy rows within `symbols` into a single
    /// per-CRB usage vector, with every CRB outside `bwp_crb_lims` forced
    /// to "used" to fence the BWP boundaries.
    pub fn used_crbs(&self, bwp_crb_lims: CrbInterval, symbols: OfdmSymbolRange) -> Bitmap {
        self.check_symbols(symbols);
        assert!(
            bwp_crb_lims.stop() <= MAX_NOF_PRBS,
            "BWP limits {} exceed {} CRBs",
            bwp_crb_lims,
            MAX_NOF_PRBS
        );
        let mut used = Bitmap::new(MAX_NOF_PRBS as usize);

        // Accumulate each symbol row into the output 64 RBs at a time.
        let bandwidth = self.bandwidth as usize;
        for symbol in symbols.iter() {
            let row = self.row_offset(symbol);
            let mut rb = 0;
            while rb < bandwidth {
                let chunk = (bandwidth - rb).min(64);
                let mut word = self.bits.extract_word(row + rb);
                if chunk < 64 {
                    word &= (1u64 << chunk) - 1;
                }
                used.or_word_at(self.offset as usize + rb, word);
                rb += 64;
            }
        }

        // Fence everything outside the BWP limits.
        used.set_range(0, bwp_crb_lims.start() as usize);
        used.set_range(bwp_crb_lims.stop() as usize, MAX_NOF_PRBS as usize);
        used
    }

    fn row_offset(&self, symbol: u8) -> usize {
        symbol as usize * self.bandwidth as usize
    }

    fn check_symbols(&self, symbols: OfdmSymbolRange) {
        assert!(
            symbols.stop() <= NOF_OFDM_SYM_PER_SLOT,
            "symbol range {} exceeds the {}-symbol slot",
            symbols,
            NOF_OFDM_SYM_PER_SLOT
        );
    }

    fn to_carrier_local(&self, crbs: CrbInterval) -> CrbInterval {
        assert!(
            self.rb_dims().contains_interval(crbs),
            "CRBs {} outside carrier {} ({:?})",
            crbs,
            self.rb_dims(),
            self.scs
        );
        crbs.displace(-(self.offset as i32))
    }

    fn to_carrier_local_rb(&self, crb: u16) -> usize {
        assert!(
            self.rb_dims().contains(crb),
            "CRB {} outside carrier {} ({:?})",
            crb,
            self.rb_dims(),
            self.scs
        );
        (crb - self.offset) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(offset: u16, bandwidth: u16) -> CarrierSubslotResourceGrid {
        CarrierSubslotResourceGrid::new(ScsSpecificCarrier {
            scs: SubcarrierSpacing::Scs15,
            offset_to_carrier: offset,
            carrier_bandwidth: bandwidth,
        })
    }

    #[test]
    fn test_collides_before_and_after_fill() {
        let mut g = grid(0, 52);
        let symbols = OfdmSymbolRange::new(2, 14);
        let crbs = CrbInterval::new(10, 20);
        assert!(!g.collides(symbols, crbs));
        g.fill(symbols, crbs);
        assert!(g.collides(symbols, crbs));
        assert!(g.all_set(symbols, crbs));
    }

    #[test]
    fn test_no_false_collision_between_disjoint_regions() {
        let mut g = grid(0, 52);
        let a = (OfdmSymbolRange::new(0, 2), CrbInterval::new(0, 10));
        let b = (OfdmSymbolRange::new(2, 4), CrbInterval::new(0, 10));
        let c = (OfdmSymbolRange::new(0, 2), CrbInterval::new(10, 20));
        g.fill(a.0, a.1);
        g.fill(b.0, b.1);
        assert!(g.collides(a.0, a.1));
        assert!(g.collides(b.0, b.1));
        assert!(!g.collides(c.0, c.1));
    }

    #[test]
    fn test_full_bandwidth_pdsch_scenario() {
        // 15 kHz SCS, 52 RBs, PDSCH over symbols [2, 14)
        let mut g = grid(0, 52);
        g.fill(OfdmSymbolRange::new(2, 14), CrbInterval::new(0, 52));
        assert!(g.all_set(OfdmSymbolRange::new(2, 14), CrbInterval::new(0, 52)));
        assert!(!g.collides(OfdmSymbolRange::new(0, 2), CrbInterval::new(0, 52)));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut g = grid(0, 52);
        g.fill(OfdmSymbolRange::new(0, 14), CrbInterval::new(0, 52));
        g.clear();
        assert!(!g.collides(OfdmSymbolRange::new(0, 14), CrbInterval::new(0, 52)));
        g.clear();
        assert!(!g.collides(OfdmSymbolRange::new(0, 14), CrbInterval::new(0, 52)));
    }

    #[test]
    fn test_carrier_offset_displacement() {
        // Carrier covering CRBs [100, 152)
        let mut g = grid(100, 52);
        let symbols = OfdmSymbolRange::new(0, 14);
        g.fill(symbols, CrbInterval::new(100, 110));
        assert!(g.collides(symbols, CrbInterval::new(100, 101)));
        assert!(!g.collides(symbols, CrbInterval::new(110, 152)));
    }

    #[test]
    fn test_sparse_list_fill_and_collides() {
        let mut g = grid(0, 106);
        let symbols = OfdmSymbolRange::new(13, 14);
        // Frequency-hopped PUCCH on the band edges
        g.fill_list(symbols, &[0, 105]);
        assert!(g.collides_list(symbols, &[0]));
        assert!(g.collides_list(symbols, &[105]));
        assert!(!g.collides_list(symbols, &[1, 50, 104]));
        assert!(!g.collides(OfdmSymbolRange::new(0, 13), CrbInterval::new(0, 106)));
    }

    #[test]
    fn test_used_crbs_fold() {
        let mut g = grid(0, 52);
        g.fill(OfdmSymbolRange::new(2, 3), CrbInterval::new(10, 20));
        let bwp = CrbInterval::new(0, 52);

        // Any symbol range containing symbol 2 sees CRBs [10, 20) used
        let used = g.used_crbs(bwp, OfdmSymbolRange::new(0, 14));
        for crb in 0..52 {
            assert_eq!(used.test(crb), (10..20).contains(&crb), "crb {}", crb);
        }
        // Everything outside the BWP is fenced as used
        for crb in 52..MAX_NOF_PRBS as usize {
            assert!(used.test(crb));
        }

        // A symbol range excluding symbol 2 sees a free BWP
        let used = g.used_crbs(bwp, OfdmSymbolRange::new(3, 14));
        for crb in 0..52 {
            assert!(!used.test(crb), "crb {}", crb);
        }
    }

    #[test]
    fn test_used_crbs_bwp_fencing() {
        let g = grid(0, 52);
        let used = g.used_crbs(CrbInterval::new(5, 30), OfdmSymbolRange::new(0, 14));
        for crb in 0..MAX_NOF_PRBS as usize {
            assert_eq!(used.test(crb), !(5..30).contains(&crb), "crb {}", crb);
        }
    }

    #[test]
    fn test_used_crbs_offset_carrier_wide_bandwidth() {
        // Wide carrier so the fold crosses word boundaries
        let mut g = grid(3, 272);
        g.fill(OfdmSymbolRange::new(5, 6), CrbInterval::new(60, 140));
        let used = g.used_crbs(CrbInterval::new(3, 275), OfdmSymbolRange::new(0, 14));
        for crb in 3..275 {
            assert_eq!(used.test(crb), (60..140).contains(&crb), "crb {}", crb);
        }
        for crb in 0..3 {
            assert!(used.test(crb));
        }
    }

    #[test]
    #[should_panic]
    fn test_fill_outside_carrier_panics() {
        let mut g = grid(10, 52);
        g.fill(OfdmSymbolRange::new(0, 1), CrbInterval::new(0, 5));
    }

    #[test]
    #[should_panic]
    fn test_fill_outside_slot_panics() {
        let mut g = grid(0, 52);
        g.fill(OfdmSymbolRange::new(10, 15), CrbInterval::new(0, 5));
    }
}
