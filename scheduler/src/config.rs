//! Cell Configuration
//!
//! Static per-cell configuration consumed by the resource grid core: the
//! per-direction carrier list (one entry per active subcarrier spacing),
//! the duplex pattern used to derive per-slot DL/UL symbol counts, and the
//! scheduling-delay bounds that size the allocation ring.

use crate::SchedulerError;
use common::types::{CellId, Pci, SubcarrierSpacing, MAX_NOF_PRBS, NOF_OFDM_SYM_PER_SLOT};
use common::{CrbInterval, SlotPoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum PDCCH-to-PDSCH slot delay K0 (3GPP TS 38.214)
pub const SCHEDULER_MAX_K0: u16 = 15;

/// Maximum PDSCH-to-HARQ-feedback slot delay K1 (3GPP TS 38.213)
pub const SCHEDULER_MAX_K1: u16 = 15;

/// Maximum PDCCH-to-PUSCH slot delay K2 (3GPP TS 38.214)
pub const SCHEDULER_MAX_K2: u16 = 15;

/// Maximum Msg3 delta beyond K2 for RAR-scheduled PUSCH (3GPP TS 38.213)
pub const MAX_MSG3_DELTA: u16 = 6;

/// Carrier parameters for one subcarrier spacing of a cell
/// (scs-SpecificCarrier, 3GPP TS 38.331)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScsSpecificCarrier {
    /// Subcarrier spacing of this carrier
    pub scs: SubcarrierSpacing,
    /// Offset in CRBs between point A and the first usable RB
    pub offset_to_carrier: u16,
    /// Carrier bandwidth in resource blocks
    pub carrier_bandwidth: u16,
}

/// TDD DL-UL pattern (tdd-UL-DL-ConfigurationCommon, 3GPP TS 38.331).
/// A period consists of `nof_dl_slots` full-DL slots, one special slot
/// with `nof_dl_symbols` leading DL symbols and `nof_ul_symbols` trailing
/// UL symbols, and `nof_ul_slots` full-UL slots at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TddConfig {
    /// Pattern period in slots of the cell's reference numerology
    pub dl_ul_period_slots: u32,
    /// Number of full-DL slots at the start of the period
    pub nof_dl_slots: u32,
    /// DL symbols at the start of the special slot
    pub nof_dl_symbols: u8,
    /// Number of full-UL slots at the end of the period
    pub nof_ul_slots: u32,
    /// UL symbols at the end of the special slot
    pub nof_ul_symbols: u8,
}

/// Duplex mode of the cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplexMode {
    Fdd,
    Tdd(TddConfig),
}

/// Bandwidth part: the sub-range of carrier CRBs a UE operates within
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BwpConfiguration {
    /// Subcarrier spacing of the BWP
    pub scs: SubcarrierSpacing,
    /// CRB limits of the BWP
    pub crbs: CrbInterval,
}

/// Validated static configuration of one cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellConfiguration {
    /// Cell ID
    pub cell_id: CellId,
    /// Physical cell ID
    pub pci: Pci,
    /// Duplex mode and TDD pattern
    pub duplex: DuplexMode,
    /// NTN cell-specific koffset added to all scheduling delays
    pub ntn_cs_koffset: u16,
    dl_carriers: Vec<ScsSpecificCarrier>,
    ul_carriers: Vec<ScsSpecificCarrier>,
    max_numerology: u8,
}

impl CellConfiguration {
    /// Create a validated cell configuration
    pub fn new(
        cell_id: CellId,
        pci: Pci,
        dl_carriers: Vec<ScsSpecificCarrier>,
        ul_carriers: Vec<ScsSpecificCarrier>,
        duplex: DuplexMode,
        ntn_cs_koffset: u16,
    ) -> Result<Self, SchedulerError> {
        validate_carriers("DL", &dl_carriers)?;
        validate_carriers("UL", &ul_carriers)?;

        let max_numerology = dl_carriers
            .iter()
            .chain(ul_carriers.iter())
            .map(|c| c.scs.to_numerology())
            .max()
            .unwrap_or(0);

        if let DuplexMode::Tdd(tdd) = &duplex {
            validate_tdd(tdd, max_numerology)?;
        }

        debug!(
            "Cell {} configured: {} DL carriers, {} UL carriers, max numerology {}",
            cell_id.0,
            dl_carriers.len(),
            ul_carriers.len(),
            max_numerology
        );

        Ok(Self {
            cell_id,
            pci,
            duplex,
            ntn_cs_koffset,
            dl_carriers,
            ul_carriers,
            max_numerology,
        })
    }

    /// Active DL carriers, one per subcarrier spacing
    pub fn dl_carriers(&self) -> &[ScsSpecificCarrier] {
        &self.dl_carriers
    }

    /// Active UL carriers, one per subcarrier spacing
    pub fn ul_carriers(&self) -> &[ScsSpecificCarrier] {
        &self.ul_carriers
    }

    /// Highest numerology among all configured carriers. Slot indications
    /// are counted at this numerology.
    pub fn max_numerology(&self) -> u8 {
        self.max_numerology
    }

    /// Maximum number of slots a DL allocation may be placed ahead of the
    /// current slot
    pub fn max_dl_slot_alloc_delay(&self) -> u16 {
        SCHEDULER_MAX_K0 + self.ntn_cs_koffset
    }

    /// Maximum number of slots a UL allocation may be placed ahead of the
    /// slot of the scheduling PDCCH
    pub fn max_ul_slot_alloc_delay(&self) -> u16 {
        SCHEDULER_MAX_K1.max(SCHEDULER_MAX_K2 + MAX_MSG3_DELTA) + self.ntn_cs_koffset
    }

    /// Number of DL symbols in the given slot. Varies within the TDD
    /// pattern period; constant 14 for FDD.
    pub fn nof_dl_symbols(&self, slot: SlotPoint) -> u8 {
        match &self.duplex {
            DuplexMode::Fdd => NOF_OFDM_SYM_PER_SLOT,
            DuplexMode::Tdd(tdd) => {
                let slot_in_period = slot.to_uint() % tdd.dl_ul_period_slots;
                if slot_in_period < tdd.nof_dl_slots {
                    NOF_OFDM_SYM_PER_SLOT
                } else if slot_in_period == tdd.nof_dl_slots {
                    tdd.nof_dl_symbols
                } else {
                    0
                }
            }
        }
    }

    /// Number of UL symbols in the given slot. Varies within the TDD
    /// pattern period; constant 14 for FDD.
    pub fn nof_ul_symbols(&self, slot: SlotPoint) -> u8 {
        match &self.duplex {
            DuplexMode::Fdd => NOF_OFDM_SYM_PER_SLOT,
            DuplexMode::Tdd(tdd) => {
                let slot_in_period = slot.to_uint() % tdd.dl_ul_period_slots;
                if slot_in_period >= tdd.dl_ul_period_slots - tdd.nof_ul_slots {
                    NOF_OFDM_SYM_PER_SLOT
                } else if slot_in_period == tdd.nof_dl_slots {
                    tdd.nof_ul_symbols
                } else {
                    0
                }
            }
        }
    }
}

fn validate_carriers(
    direction: &str,
    carriers: &[ScsSpecificCarrier],
) -> Result<(), SchedulerError> {
    if carriers.is_empty() {
        return Err(SchedulerError::InvalidConfiguration(format!(
            "no {} carriers configured",
            direction
        )));
    }
    for (i, carrier) in carriers.iter().enumerate() {
        if carrier.carrier_bandwidth == 0 {
            return Err(SchedulerError::InvalidConfiguration(format!(
                "{} carrier {:?} has zero bandwidth",
                direction, carrier.scs
            )));
        }
        if carrier.offset_to_carrier + carrier.carrier_bandwidth > MAX_NOF_PRBS {
            return Err(SchedulerError::InvalidConfiguration(format!(
                "{} carrier {:?} exceeds {} CRBs",
                direction, carrier.scs, MAX_NOF_PRBS
            )));
        }
        if carriers[..i].iter().any(|c| c.scs == carrier.scs) {
            return Err(SchedulerError::InvalidConfiguration(format!(
                "duplicate {} carrier for {:?}",
                direction, carrier.scs
            )));
        }
    }
    Ok(())
}

fn validate_tdd(tdd: &TddConfig, max_numerology: u8) -> Result<(), SchedulerError> {
    if tdd.dl_ul_period_slots == 0 {
        return Err(SchedulerError::InvalidConfiguration(
            "TDD period of zero slots".into(),
        ));
    }
    // The period must tile the radio frame so slot-count modulo stays
    // consistent across SFN wraparound.
    let slots_per_frame = common::types::NOF_SUBFRAMES_PER_FRAME << max_numerology;
    if slots_per_frame % tdd.dl_ul_period_slots != 0 {
        return Err(SchedulerError::InvalidConfiguration(format!(
            "TDD period of {} slots does not divide the {}-slot frame",
            tdd.dl_ul_period_slots, slots_per_frame
        )));
    }
    if tdd.nof_dl_slots + tdd.nof_ul_slots > tdd.dl_ul_period_slots {
        return Err(SchedulerError::InvalidConfiguration(
            "TDD DL and UL slots exceed the pattern period".into(),
        ));
    }
    let has_special_slot = tdd.nof_dl_slots + tdd.nof_ul_slots < tdd.dl_ul_period_slots;
    if !has_special_slot && (tdd.nof_dl_symbols != 0 || tdd.nof_ul_symbols != 0) {
        return Err(SchedulerError::InvalidConfiguration(
            "TDD pattern has no special slot for the configured symbols".into(),
        ));
    }
    if tdd.nof_dl_symbols as u16 + tdd.nof_ul_symbols as u16 > NOF_OFDM_SYM_PER_SLOT as u16 {
        return Err(SchedulerError::InvalidConfiguration(
            "TDD special-slot symbols exceed the slot length".into(),
        ));
    }
    Ok(())
}
