//! Per-Slot Scheduling Results
//!
//! Containers for the grants the scheduling policy emits for one slot.
//! The lists are appended to during the scheduling tick and handed to the
//! lower layers before the owning ring entry is recycled. Every list
//! reserves its capacity once at construction; `clear()` keeps the
//! allocation so the steady-state tick never touches the heap.
//!
//! Invariant (by scheduler discipline, not checked here): every grant
//! appended to a result list had its resources reserved beforehand via
//! `fill()` on the matching carrier grid.

use common::types::{Rnti, SubcarrierSpacing};
use common::{CrbInterval, OfdmSymbolRange};

/// Maximum PDCCH PDUs per direction per slot
const MAX_PDCCH_PDUS_PER_SLOT: usize = 16;
/// Maximum PDSCH UE grants per slot
const MAX_DL_GRANTS_PER_SLOT: usize = 16;
/// Maximum PUSCH grants per slot
const MAX_UL_GRANTS_PER_SLOT: usize = 16;
/// Maximum PUCCH PDUs per slot
const MAX_PUCCH_PDUS_PER_SLOT: usize = 32;
/// Maximum SSB beams transmitted in one slot
const MAX_SSB_PER_SLOT: usize = 2;
/// Maximum SI/paging PDSCHs per slot
const MAX_SI_PDUS_PER_SLOT: usize = 2;
/// Maximum PRACH occasions per slot
const MAX_PRACH_OCCASIONS_PER_SLOT: usize = 4;
/// Maximum CSI-RS resources per slot
const MAX_CSI_RS_PDUS_PER_SLOT: usize = 4;

/// Resource reservation request: numerology, symbol span and CRB interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantInfo {
    /// Subcarrier spacing selecting the carrier grid
    pub scs: SubcarrierSpacing,
    /// OFDM symbols of the reservation
    pub symbols: OfdmSymbolRange,
    /// CRBs of the reservation
    pub crbs: CrbInterval,
}

impl GrantInfo {
    /// Create a new grant descriptor
    pub fn new(scs: SubcarrierSpacing, symbols: OfdmSymbolRange, crbs: CrbInterval) -> Self {
        Self { scs, symbols, crbs }
    }
}

/// Scheduled SSB transmission
#[derive(Debug, Clone)]
pub struct SsbInformation {
    /// SSB beam index
    pub ssb_index: u8,
    /// Symbols occupied by the SSB within the slot
    pub symbols: OfdmSymbolRange,
    /// CRBs occupied by the SSB
    pub crbs: CrbInterval,
}

/// PDSCH transmission parameters shared by all DL grant kinds
#[derive(Debug, Clone)]
pub struct PdschInformation {
    /// Addressed RNTI (C-RNTI, SI-RNTI, P-RNTI, ...)
    pub rnti: Rnti,
    /// PDSCH symbols
    pub symbols: OfdmSymbolRange,
    /// PDSCH CRBs
    pub crbs: CrbInterval,
    /// Transport block size in bytes
    pub tbs_bytes: u32,
}

/// System information indicator of a SIB PDSCH
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiIndicator {
    Sib1,
    OtherSi,
}

/// Scheduled system information PDSCH
#[derive(Debug, Clone)]
pub struct SibInformation {
    /// SIB1 or other SI message
    pub si_indicator: SiIndicator,
    /// PDSCH carrying the SI message
    pub pdsch: PdschInformation,
}

/// Scheduled paging PDSCH
#[derive(Debug, Clone)]
pub struct PagingInformation {
    /// PDSCH carrying the paging message
    pub pdsch: PdschInformation,
}

/// Scheduled PDCCH transmission
#[derive(Debug, Clone)]
pub struct PdcchInformation {
    /// Addressed RNTI
    pub rnti: Rnti,
    /// CORESET symbols
    pub symbols: OfdmSymbolRange,
    /// CORESET CRBs
    pub crbs: CrbInterval,
    /// Aggregation level (number of CCEs)
    pub aggregation_level: u8,
}

/// Scheduled CSI-RS resource
#[derive(Debug, Clone)]
pub struct CsiRsInformation {
    /// Symbols carrying the CSI-RS
    pub symbols: OfdmSymbolRange,
    /// CRBs spanned by the CSI-RS resource
    pub crbs: CrbInterval,
}

/// Scheduled PUSCH reception
#[derive(Debug, Clone)]
pub struct PuschInformation {
    /// Transmitting RNTI
    pub rnti: Rnti,
    /// PUSCH symbols
    pub symbols: OfdmSymbolRange,
    /// PUSCH CRBs
    pub crbs: CrbInterval,
    /// Transport block size in bytes
    pub tbs_bytes: u32,
}

/// Scheduled PUCCH reception. Frequency-hopped PUCCHs occupy two
/// disjoint RB sets, reserved through the sparse-list fill path.
#[derive(Debug, Clone)]
pub struct PucchInformation {
    /// Transmitting RNTI
    pub rnti: Rnti,
    /// PUCCH symbols
    pub symbols: OfdmSymbolRange,
    /// CRBs of the first hop
    pub crbs: CrbInterval,
    /// CRBs of the second hop, when frequency hopping is enabled
    pub second_hop_crbs: Option<CrbInterval>,
}

/// PRACH occasion the cell listens on
#[derive(Debug, Clone)]
pub struct PrachOccasionInfo {
    /// First symbol of the occasion
    pub start_symbol: u8,
    /// Number of time-multiplexed occasions
    pub nof_occasions: u8,
    /// CRBs of the PRACH frequency allocation
    pub crbs: CrbInterval,
}

/// Downlink scheduling outcome for one slot
#[derive(Debug, Clone)]
pub struct DlSchedResult {
    /// Number of DL symbols available in this slot (TDD-pattern dependent)
    pub nof_dl_symbols: u8,
    /// Scheduled SSB transmissions
    pub ssb_info: Vec<SsbInformation>,
    /// Scheduled SI PDSCHs
    pub sibs: Vec<SibInformation>,
    /// Scheduled paging PDSCHs
    pub paging: Vec<PagingInformation>,
    /// PDCCHs carrying DL assignments
    pub dl_pdcchs: Vec<PdcchInformation>,
    /// PDCCHs carrying UL grants
    pub ul_pdcchs: Vec<PdcchInformation>,
    /// UE PDSCH grants
    pub ue_grants: Vec<PdschInformation>,
    /// Scheduled CSI-RS resources
    pub csi_rs: Vec<CsiRsInformation>,
}

impl DlSchedResult {
    fn new() -> Self {
        Self {
            nof_dl_symbols: 0,
            ssb_info: Vec::with_capacity(MAX_SSB_PER_SLOT),
            sibs: Vec::with_capacity(MAX_SI_PDUS_PER_SLOT),
            paging: Vec::with_capacity(MAX_SI_PDUS_PER_SLOT),
            dl_pdcchs: Vec::with_capacity(MAX_PDCCH_PDUS_PER_SLOT),
            ul_pdcchs: Vec::with_capacity(MAX_PDCCH_PDUS_PER_SLOT),
            ue_grants: Vec::with_capacity(MAX_DL_GRANTS_PER_SLOT),
            csi_rs: Vec::with_capacity(MAX_CSI_RS_PDUS_PER_SLOT),
        }
    }

    /// Empty every grant list, keeping capacity
    pub fn clear(&mut self) {
        self.nof_dl_symbols = 0;
        self.ssb_info.clear();
        self.sibs.clear();
        self.paging.clear();
        self.dl_pdcchs.clear();
        self.ul_pdcchs.clear();
        self.ue_grants.clear();
        self.csi_rs.clear();
    }

    /// True if no DL grant of any kind was scheduled
    pub fn is_empty(&self) -> bool {
        self.ssb_info.is_empty()
            && self.sibs.is_empty()
            && self.paging.is_empty()
            && self.dl_pdcchs.is_empty()
            && self.ul_pdcchs.is_empty()
            && self.ue_grants.is_empty()
            && self.csi_rs.is_empty()
    }
}

/// Uplink scheduling outcome for one slot
#[derive(Debug, Clone)]
pub struct UlSchedResult {
    /// Number of UL symbols available in this slot (TDD-pattern dependent)
    pub nof_ul_symbols: u8,
    /// Scheduled PUSCH receptions
    pub puschs: Vec<PuschInformation>,
    /// Scheduled PUCCH receptions
    pub pucchs: Vec<PucchInformation>,
    /// PRACH occasions
    pub prachs: Vec<PrachOccasionInfo>,
}

impl UlSchedResult {
    fn new() -> Self {
        Self {
            nof_ul_symbols: 0,
            puschs: Vec::with_capacity(MAX_UL_GRANTS_PER_SLOT),
            pucchs: Vec::with_capacity(MAX_PUCCH_PDUS_PER_SLOT),
            prachs: Vec::with_capacity(MAX_PRACH_OCCASIONS_PER_SLOT),
        }
    }

    /// Empty every grant list, keeping capacity
    pub fn clear(&mut self) {
        self.nof_ul_symbols = 0;
        self.puschs.clear();
        self.pucchs.clear();
        self.prachs.clear();
    }

    /// True if no UL grant of any kind was scheduled
    pub fn is_empty(&self) -> bool {
        self.puschs.is_empty() && self.pucchs.is_empty() && self.prachs.is_empty()
    }
}

/// Complete scheduling outcome of one slot
#[derive(Debug, Clone)]
pub struct SchedulerSlotResult {
    /// Downlink grants
    pub dl: DlSchedResult,
    /// Uplink grants
    pub ul: UlSchedResult,
}

impl SchedulerSlotResult {
    /// Create an empty result with all list capacities pre-reserved
    pub fn new() -> Self {
        Self {
            dl: DlSchedResult::new(),
            ul: UlSchedResult::new(),
        }
    }

    /// Empty every grant list, keeping capacity
    pub fn clear(&mut self) {
        self.dl.clear();
        self.ul.clear();
    }
}

impl Default for SchedulerSlotResult {
    fn default() -> Self {
        Self::new()
    }
}
