//! Cell Slot Resource Grid
//!
//! One cell-wide occupancy API over the potentially several numerologies
//! active in one slot, and the ring-entry context that couples the DL and
//! UL grids with the slot's accumulating scheduling result.

use crate::cell::carrier_grid::CarrierSubslotResourceGrid;
use crate::config::{BwpConfiguration, CellConfiguration, ScsSpecificCarrier};
use crate::result::{GrantInfo, SchedulerSlotResult};
use common::types::{SubcarrierSpacing, NOF_NUMEROLOGIES};
use common::{Bitmap, CrbInterval, OfdmSymbolRange, SlotPoint};
use std::sync::Arc;

/// Aggregate of one carrier grid per active numerology for one direction
/// (DL or UL) of a cell
#[derive(Debug, Clone)]
pub struct SlotResourceGrid {
    /// One grid per active carrier
    carriers: Vec<CarrierSubslotResourceGrid>,
    /// Numerology index -> position in `carriers`; `None` marks an
    /// inactive numerology
    numerology_to_grid_idx: [Option<u8>; NOF_NUMEROLOGIES],
}

impl SlotResourceGrid {
    /// Create a grid aggregate for the given carriers. At most one
    /// carrier per numerology.
    pub fn new(carriers: &[ScsSpecificCarrier]) -> Self {
        let mut numerology_to_grid_idx = [None; NOF_NUMEROLOGIES];
        let mut grids = Vec::with_capacity(carriers.len());
        for carrier in carriers {
            let mu = carrier.scs.to_numerology() as usize;
            assert!(
                numerology_to_grid_idx[mu].is_none(),
                "duplicate carrier for numerology {}",
                mu
            );
            numerology_to_grid_idx[mu] = Some(grids.len() as u8);
            grids.push(CarrierSubslotResourceGrid::new(*carrier));
        }
        Self {
            carriers: grids,
            numerology_to_grid_idx,
        }
    }

    /// Numerologies with an active carrier in this grid
    pub fn active_scs(&self) -> impl Iterator<Item = SubcarrierSpacing> + '_ {
        self.carriers.iter().map(|c| c.scs())
    }

    /// Carrier grid for the given subcarrier spacing. Querying an
    /// inactive numerology is a contract violation.
    pub fn get_carrier(&self, scs: SubcarrierSpacing) -> &CarrierSubslotResourceGrid {
        let mu = scs.to_numerology() as usize;
        match self.numerology_to_grid_idx[mu] {
            Some(idx) => &self.carriers[idx as usize],
            None => panic!("numerology {} not active in this cell", mu),
        }
    }

    fn get_carrier_mut(&mut self, scs: SubcarrierSpacing) -> &mut CarrierSubslotResourceGrid {
        let mu = scs.to_numerology() as usize;
        match self.numerology_to_grid_idx[mu] {
            Some(idx) => &mut self.carriers[idx as usize],
            None => panic!("numerology {} not active in this cell", mu),
        }
    }

    /// Reserve the resources described by the grant
    pub fn fill(&mut self, grant: GrantInfo) {
        self.get_carrier_mut(grant.scs).fill(grant.symbols, grant.crbs);
    }

    /// Reserve a sparse CRB list on the carrier of the given spacing
    pub fn fill_list(&mut self, scs: SubcarrierSpacing, symbols: OfdmSymbolRange, crbs: &[u16]) {
        self.get_carrier_mut(scs).fill_list(symbols, crbs);
    }

    /// True if the grant overlaps any prior reservation
    pub fn collides(&self, grant: GrantInfo) -> bool {
        self.get_carrier(grant.scs).collides(grant.symbols, grant.crbs)
    }

    /// Explicit-numerology variant of `collides`
    pub fn collides_crbs(
        &self,
        scs: SubcarrierSpacing,
        symbols: OfdmSymbolRange,
        crbs: CrbInterval,
    ) -> bool {
        self.get_carrier(scs).collides(symbols, crbs)
    }

    /// Sparse-list variant of `collides`
    pub fn collides_list(
        &self,
        scs: SubcarrierSpacing,
        symbols: OfdmSymbolRange,
        crbs: &[u16],
    ) -> bool {
        self.get_carrier(scs).collides_list(symbols, crbs)
    }

    /// Per-CRB usage vector over the given BWP
    pub fn used_crbs(&self, bwp: &BwpConfiguration, symbols: OfdmSymbolRange) -> Bitmap {
        self.get_carrier(bwp.scs).used_crbs(bwp.crbs, symbols)
    }

    /// Explicit-numerology variant of `used_crbs`
    pub fn used_crbs_scs(
        &self,
        scs: SubcarrierSpacing,
        crb_lims: CrbInterval,
        symbols: OfdmSymbolRange,
    ) -> Bitmap {
        self.get_carrier(scs).used_crbs(crb_lims, symbols)
    }

    /// True only if every resource of the grant is reserved
    pub fn all_set(&self, grant: GrantInfo) -> bool {
        self.get_carrier(grant.scs).all_set(grant.symbols, grant.crbs)
    }

    /// Explicit-numerology variant of `all_set`
    pub fn all_set_crbs(
        &self,
        scs: SubcarrierSpacing,
        symbols: OfdmSymbolRange,
        crbs: CrbInterval,
    ) -> bool {
        self.get_carrier(scs).all_set(symbols, crbs)
    }

    /// Clear every carrier grid
    pub fn clear(&mut self) {
        for carrier in &mut self.carriers {
            carrier.clear();
        }
    }
}

/// One entry of the allocation ring: the DL and UL occupancy grids of a
/// single slot plus the scheduling result accumulated for it
#[derive(Debug)]
pub struct CellSlotResourceGrid {
    cfg: Arc<CellConfiguration>,
    slot: Option<SlotPoint>,
    /// Downlink occupancy grids
    pub dl_res_grid: SlotResourceGrid,
    /// Uplink occupancy grids
    pub ul_res_grid: SlotResourceGrid,
    /// Grants accumulated for this slot by the scheduling policy
    pub result: SchedulerSlotResult,
}

impl CellSlotResourceGrid {
    /// Create the ring entry at `ring_index`. A carrier of numerology mu
    /// is present only in ring indices aligned with its slot boundaries:
    /// `ring_index % 2^(max_numerology - mu) == 0`.
    pub(crate) fn new(cfg: Arc<CellConfiguration>, ring_index: usize) -> Self {
        let max_mu = cfg.max_numerology();
        let active = |carriers: &[ScsSpecificCarrier]| -> Vec<ScsSpecificCarrier> {
            carriers
                .iter()
                .filter(|c| {
                    let ratio = 1usize << (max_mu - c.scs.to_numerology());
                    ring_index % ratio == 0
                })
                .copied()
                .collect()
        };
        let dl_res_grid = SlotResourceGrid::new(&active(cfg.dl_carriers()));
        let ul_res_grid = SlotResourceGrid::new(&active(cfg.ul_carriers()));
        Self {
            cfg,
            slot: None,
            dl_res_grid,
            ul_res_grid,
            result: SchedulerSlotResult::new(),
        }
    }

    /// Slot this entry is currently bound to. Accessing it before the
    /// first slot indication is a contract violation.
    pub fn slot(&self) -> SlotPoint {
        match self.slot {
            Some(slot) => slot,
            None => panic!("slot grid accessed before the first slot indication"),
        }
    }

    /// Rebind the entry to a new slot: clears both occupancy grids and
    /// every result list, and recomputes the DL/UL symbol counts from the
    /// cell's duplex pattern (they vary slot to slot under TDD).
    pub fn slot_indication(&mut self, new_slot: SlotPoint) {
        self.slot = Some(new_slot);
        self.dl_res_grid.clear();
        self.ul_res_grid.clear();
        self.result.clear();
        self.result.dl.nof_dl_symbols = self.cfg.nof_dl_symbols(new_slot);
        self.result.ul.nof_ul_symbols = self.cfg.nof_ul_symbols(new_slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DuplexMode, TddConfig};
    use common::types::{CellId, Pci, NOF_OFDM_SYM_PER_SLOT};

    fn carrier(scs: SubcarrierSpacing, offset: u16, bw: u16) -> ScsSpecificCarrier {
        ScsSpecificCarrier {
            scs,
            offset_to_carrier: offset,
            carrier_bandwidth: bw,
        }
    }

    #[test]
    fn test_dispatch_by_numerology() {
        let mut grid = SlotResourceGrid::new(&[
            carrier(SubcarrierSpacing::Scs15, 0, 52),
            carrier(SubcarrierSpacing::Scs30, 0, 106),
        ]);
        let active: Vec<_> = grid.active_scs().collect();
        assert_eq!(
            active,
            vec![SubcarrierSpacing::Scs15, SubcarrierSpacing::Scs30]
        );

        let grant = GrantInfo::new(
            SubcarrierSpacing::Scs15,
            OfdmSymbolRange::new(0, 2),
            CrbInterval::new(0, 24),
        );
        grid.fill(grant);
        assert!(grid.collides(grant));
        assert!(grid.all_set(grant));
        // The 30 kHz carrier is untouched
        assert!(!grid.collides_crbs(
            SubcarrierSpacing::Scs30,
            OfdmSymbolRange::new(0, 2),
            CrbInterval::new(0, 24)
        ));
    }

    #[test]
    #[should_panic]
    fn test_inactive_numerology_panics() {
        let grid = SlotResourceGrid::new(&[carrier(SubcarrierSpacing::Scs15, 0, 52)]);
        let _ = grid.get_carrier(SubcarrierSpacing::Scs120);
    }

    #[test]
    fn test_used_crbs_via_bwp() {
        let mut grid = SlotResourceGrid::new(&[carrier(SubcarrierSpacing::Scs15, 0, 52)]);
        grid.fill(GrantInfo::new(
            SubcarrierSpacing::Scs15,
            OfdmSymbolRange::new(2, 3),
            CrbInterval::new(10, 20),
        ));
        let bwp = BwpConfiguration {
            scs: SubcarrierSpacing::Scs15,
            crbs: CrbInterval::new(0, 52),
        };
        let used = grid.used_crbs(&bwp, OfdmSymbolRange::new(0, 14));
        assert!(used.test(10));
        assert!(used.test(19));
        assert!(!used.test(20));
    }

    fn tdd_cfg() -> Arc<CellConfiguration> {
        let tdd = TddConfig {
            dl_ul_period_slots: 10,
            nof_dl_slots: 6,
            nof_dl_symbols: 8,
            nof_ul_slots: 3,
            nof_ul_symbols: 4,
        };
        Arc::new(
            CellConfiguration::new(
                CellId(1),
                Pci(1),
                vec![carrier(SubcarrierSpacing::Scs30, 0, 106)],
                vec![carrier(SubcarrierSpacing::Scs30, 0, 106)],
                DuplexMode::Tdd(tdd),
                0,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_slot_indication_resets_state() {
        let cfg = tdd_cfg();
        let mut entry = CellSlotResourceGrid::new(cfg, 0);

        let dl_slot = SlotPoint::new(SubcarrierSpacing::Scs30, 0);
        entry.slot_indication(dl_slot);
        assert_eq!(entry.slot(), dl_slot);
        assert_eq!(entry.result.dl.nof_dl_symbols, NOF_OFDM_SYM_PER_SLOT);
        assert_eq!(entry.result.ul.nof_ul_symbols, 0);

        let grant = GrantInfo::new(
            SubcarrierSpacing::Scs30,
            OfdmSymbolRange::new(0, 14),
            CrbInterval::new(0, 106),
        );
        entry.dl_res_grid.fill(grant);
        entry.result.dl.ssb_info.push(crate::result::SsbInformation {
            ssb_index: 0,
            symbols: OfdmSymbolRange::new(2, 6),
            crbs: CrbInterval::new(0, 20),
        });

        // Rebinding to the special slot clears grids, results and
        // recomputes the symbol counts.
        let special_slot = SlotPoint::new(SubcarrierSpacing::Scs30, 6);
        entry.slot_indication(special_slot);
        assert_eq!(entry.slot(), special_slot);
        assert!(!entry.dl_res_grid.collides(grant));
        assert!(entry.result.dl.is_empty());
        assert_eq!(entry.result.dl.nof_dl_symbols, 8);
        assert_eq!(entry.result.ul.nof_ul_symbols, 4);
    }

    #[test]
    #[should_panic]
    fn test_slot_access_before_indication_panics() {
        let entry = CellSlotResourceGrid::new(tdd_cfg(), 0);
        let _ = entry.slot();
    }
}
