//! Cell Resource Allocator
//!
//! Ring buffer of pre-constructed per-slot grid contexts, one cell. Maps
//! an abstract future slot to a concrete, recycled grid instance and
//! advances the allocation window by exactly one slot per tick. All ring
//! entries are built once at cell creation; steady-state operation only
//! rebinds them in place, never allocates.

use crate::cell::slot_grid::CellSlotResourceGrid;
use crate::config::CellConfiguration;
use common::SlotPoint;
use std::ops::{Index, IndexMut};
use std::sync::Arc;
use tracing::{info, trace};

/// Ring of slot grid contexts covering the scheduler's full lookahead
#[derive(Debug)]
pub struct CellResourceAllocator {
    cfg: Arc<CellConfiguration>,
    /// Ring entries, indexed by `slot.to_uint() % ring_size`
    slots: Vec<CellSlotResourceGrid>,
    /// Most recently indicated slot
    last_slot_ind: Option<SlotPoint>,
    /// Number of slots kept readable behind the current slot
    history_size: u32,
    /// Number of slots reachable ahead of the current slot
    lookahead_size: u32,
}

impl CellResourceAllocator {
    /// Create the allocator for a cell. The ring is sized from the K0/K1/
    /// K2/Msg3/NTN delay bounds and rounded up to a power of two so that
    /// `slot.to_uint() % ring_size` stays consistent across hyperframe
    /// wraparound.
    pub fn new(cfg: Arc<CellConfiguration>) -> Self {
        let lookahead =
            cfg.max_dl_slot_alloc_delay() as u32 + cfg.max_ul_slot_alloc_delay() as u32;
        let ring_size = (lookahead as usize + 1).next_power_of_two();
        let history_size = ring_size as u32 - lookahead;

        let slots: Vec<_> = (0..ring_size)
            .map(|i| CellSlotResourceGrid::new(cfg.clone(), i))
            .collect();

        info!(
            "Cell {} resource allocator: ring of {} slots ({} lookahead, {} history)",
            cfg.cell_id.0, ring_size, lookahead, history_size
        );

        Self {
            cfg,
            slots,
            last_slot_ind: None,
            history_size,
            lookahead_size: lookahead,
        }
    }

    /// Number of ring entries
    pub fn ring_size(&self) -> usize {
        self.slots.len()
    }

    /// Maximum lookahead in slots reachable through indexing
    pub fn max_slot_alloc_delay(&self) -> u32 {
        self.lookahead_size
    }

    /// Cell configuration this allocator was built from
    pub fn cfg(&self) -> &CellConfiguration {
        &self.cfg
    }

    /// Most recently indicated slot. Calling before the first indication
    /// is a contract violation.
    pub fn slot_tx(&self) -> SlotPoint {
        match self.last_slot_ind {
            Some(slot) => slot,
            None => panic!("allocator accessed before the first slot indication"),
        }
    }

    /// Advance the allocation window to `sl_tx`. Must be called exactly
    /// once per tick with consecutive slots; a skipped or out-of-order
    /// indication is a fatal programming error.
    pub fn slot_indication(&mut self, sl_tx: SlotPoint) {
        assert_eq!(
            sl_tx.numerology(),
            self.cfg.max_numerology(),
            "slot indication at numerology {} for a cell ticking at numerology {}",
            sl_tx.numerology(),
            self.cfg.max_numerology()
        );

        let ring_size = self.slots.len() as u32;
        match self.last_slot_ind {
            Some(last) => {
                assert!(
                    sl_tx == last + 1,
                    "non-sequential slot indication: {} after {}",
                    sl_tx,
                    last
                );
                // Recycle the single entry that fell out of the history
                // window, rebinding it to the far-future slot this ring
                // position represents next.
                let slot_to_reset = sl_tx - self.history_size;
                let idx = (slot_to_reset.to_uint() % ring_size) as usize;
                self.slots[idx].slot_indication(slot_to_reset + ring_size);
            }
            None => {
                // First indication: bind every entry so the ring covers
                // the full window around sl_tx.
                let base = sl_tx - (self.history_size - 1);
                for i in 0..ring_size {
                    let slot = base + i;
                    let idx = (slot.to_uint() % ring_size) as usize;
                    self.slots[idx].slot_indication(slot);
                }
            }
        }
        self.last_slot_ind = Some(sl_tx);
        trace!("Cell {} slot indication: {}", self.cfg.cell_id.0, sl_tx);
    }

    /// Grid context of an arbitrary slot within the ring window
    pub fn slot_grid(&self, slot: SlotPoint) -> &CellSlotResourceGrid {
        let entry = &self.slots[(slot.to_uint() % self.slots.len() as u32) as usize];
        assert!(
            entry.slot() == slot,
            "slot {} outside the ring window around {}",
            slot,
            self.slot_tx()
        );
        entry
    }

    /// Mutable grid context of an arbitrary slot within the ring window
    pub fn slot_grid_mut(&mut self, slot: SlotPoint) -> &mut CellSlotResourceGrid {
        let idx = (slot.to_uint() % self.slots.len() as u32) as usize;
        let entry = &mut self.slots[idx];
        assert!(
            entry.slot() == slot,
            "slot {} outside the ring window",
            slot
        );
        entry
    }
}

impl Index<usize> for CellResourceAllocator {
    type Output = CellSlotResourceGrid;

    /// Grid context `offset` slots ahead of the last indicated slot
    fn index(&self, offset: usize) -> &CellSlotResourceGrid {
        assert!(
            offset as u32 <= self.lookahead_size,
            "slot offset {} exceeds the ring lookahead of {}",
            offset,
            self.lookahead_size
        );
        self.slot_grid(self.slot_tx() + offset as u32)
    }
}

impl IndexMut<usize> for CellResourceAllocator {
    fn index_mut(&mut self, offset: usize) -> &mut CellSlotResourceGrid {
        assert!(
            offset as u32 <= self.lookahead_size,
            "slot offset {} exceeds the ring lookahead of {}",
            offset,
            self.lookahead_size
        );
        let slot = self.slot_tx() + offset as u32;
        self.slot_grid_mut(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DuplexMode, ScsSpecificCarrier};
    use crate::result::GrantInfo;
    use common::types::{CellId, Pci, SubcarrierSpacing};
    use common::{CrbInterval, OfdmSymbolRange};

    fn carrier(scs: SubcarrierSpacing, bw: u16) -> ScsSpecificCarrier {
        ScsSpecificCarrier {
            scs,
            offset_to_carrier: 0,
            carrier_bandwidth: bw,
        }
    }

    fn fdd_cfg(carriers: Vec<ScsSpecificCarrier>) -> Arc<CellConfiguration> {
        Arc::new(
            CellConfiguration::new(
                CellId(1),
                Pci(1),
                carriers.clone(),
                carriers,
                DuplexMode::Fdd,
                0,
            )
            .unwrap(),
        )
    }

    fn single_scs15_allocator() -> CellResourceAllocator {
        CellResourceAllocator::new(fdd_cfg(vec![carrier(SubcarrierSpacing::Scs15, 52)]))
    }

    #[test]
    fn test_ring_covers_delay_bounds() {
        let alloc = single_scs15_allocator();
        let lookahead = alloc.cfg().max_dl_slot_alloc_delay() as usize
            + alloc.cfg().max_ul_slot_alloc_delay() as usize;
        assert!(alloc.ring_size() >= lookahead + 1);
        assert!(alloc.ring_size().is_power_of_two());
    }

    #[test]
    fn test_first_indication_binds_whole_ring() {
        let mut alloc = single_scs15_allocator();
        let start = SlotPoint::new(SubcarrierSpacing::Scs15, 100);
        alloc.slot_indication(start);

        assert_eq!(alloc.slot_tx(), start);
        for offset in 0..=alloc.max_slot_alloc_delay() as usize {
            assert_eq!(alloc[offset].slot(), start + offset as u32);
        }
    }

    #[test]
    fn test_ring_recycling_reuses_cleared_instance() {
        let mut alloc = single_scs15_allocator();
        let ring = alloc.ring_size() as u32;
        let start = SlotPoint::new(SubcarrierSpacing::Scs15, 500);
        alloc.slot_indication(start);

        let grant = GrantInfo::new(
            SubcarrierSpacing::Scs15,
            OfdmSymbolRange::new(2, 14),
            CrbInterval::new(0, 52),
        );
        alloc[0].dl_res_grid.fill(grant);
        let original = &alloc[0] as *const CellSlotResourceGrid;

        for i in 1..=ring {
            alloc.slot_indication(start + i);
        }

        // The entry bound to `start` is the same instance, now rebound
        // one full ring later and cleared.
        let recycled = alloc.slot_grid(start + ring);
        assert_eq!(recycled as *const CellSlotResourceGrid, original);
        assert_eq!(recycled.slot(), start + ring);
        assert!(!recycled.dl_res_grid.collides(grant));
        assert!(recycled.result.dl.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_skipped_slot_indication_panics() {
        let mut alloc = single_scs15_allocator();
        let start = SlotPoint::new(SubcarrierSpacing::Scs15, 10);
        alloc.slot_indication(start);
        alloc.slot_indication(start + 2);
    }

    #[test]
    #[should_panic]
    fn test_indexing_past_lookahead_panics() {
        let mut alloc = single_scs15_allocator();
        alloc.slot_indication(SlotPoint::new(SubcarrierSpacing::Scs15, 0));
        let _ = &alloc[alloc.max_slot_alloc_delay() as usize + 1];
    }

    #[test]
    fn test_indication_across_hyperframe_wrap() {
        let mut alloc = single_scs15_allocator();
        let near_wrap = SlotPoint::new(SubcarrierSpacing::Scs15, 10240 - 2);
        alloc.slot_indication(near_wrap);
        alloc.slot_indication(near_wrap + 1);
        alloc.slot_indication(near_wrap + 2);
        assert_eq!(alloc.slot_tx().to_uint(), 0);
        assert_eq!(alloc[0].slot(), alloc.slot_tx());
        assert_eq!(alloc[5].slot(), alloc.slot_tx() + 5);
    }

    #[test]
    fn test_mixed_numerology_carrier_presence() {
        // Cell ticking at 30 kHz with an additional 15 kHz carrier: the
        // 15 kHz carrier only exists in every second ring slot.
        let mut alloc = CellResourceAllocator::new(fdd_cfg(vec![
            carrier(SubcarrierSpacing::Scs15, 52),
            carrier(SubcarrierSpacing::Scs30, 106),
        ]));
        // An even slot count lands on a 15 kHz slot boundary.
        alloc.slot_indication(SlotPoint::new(SubcarrierSpacing::Scs30, 200));

        let on_boundary: Vec<_> = alloc[0].dl_res_grid.active_scs().collect();
        assert!(on_boundary.contains(&SubcarrierSpacing::Scs15));
        assert!(on_boundary.contains(&SubcarrierSpacing::Scs30));

        let off_boundary: Vec<_> = alloc[1].dl_res_grid.active_scs().collect();
        assert_eq!(off_boundary, vec![SubcarrierSpacing::Scs30]);
    }

    #[test]
    fn test_scheduling_round_trip() {
        // Reserve ahead, then verify the reservation is still visible when
        // the slot becomes current.
        let mut alloc = single_scs15_allocator();
        alloc.slot_indication(SlotPoint::new(SubcarrierSpacing::Scs15, 42));

        let grant = GrantInfo::new(
            SubcarrierSpacing::Scs15,
            OfdmSymbolRange::new(0, 2),
            CrbInterval::new(10, 20),
        );
        let k0 = 4usize;
        assert!(!alloc[k0].dl_res_grid.collides(grant));
        alloc[k0].dl_res_grid.fill(grant);

        for _ in 0..k0 {
            let next = alloc.slot_tx() + 1;
            alloc.slot_indication(next);
        }
        assert!(alloc[0].dl_res_grid.all_set(grant));
    }
}
