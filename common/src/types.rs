//! Common Types for the 5G NR MAC Scheduler
//!
//! Defines fundamental types used throughout the scheduler core

use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Number of OFDM symbols per slot with normal cyclic prefix
pub const NOF_OFDM_SYM_PER_SLOT: u8 = 14;

/// Maximum number of PRBs supported by any NR carrier (3GPP TS 38.101)
pub const MAX_NOF_PRBS: u16 = 275;

/// Number of supported numerologies (mu = 0..4)
pub const NOF_NUMEROLOGIES: usize = 5;

/// Number of system frame numbers before the SFN counter wraps
pub const NOF_SFNS: u32 = 1024;

/// Number of subframes (1 ms) per radio frame (10 ms)
pub const NOF_SUBFRAMES_PER_FRAME: u32 = 10;

/// Radio Network Temporary Identifier (RNTI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rnti(pub u16);

impl Rnti {
    /// Create a new RNTI
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    /// Get the RNTI value
    pub fn value(&self) -> u16 {
        self.0
    }
}

/// Cell Identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub u16);

/// Physical Cell Identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pci(pub u16);

impl Pci {
    /// Maximum valid PCI value (0-1007)
    pub const MAX: u16 = 1007;

    /// Create a new PCI with validation
    pub fn new(value: u16) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }
}

/// Subcarrier spacing values in kHz
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize,
)]
pub enum SubcarrierSpacing {
    /// 15 kHz
    Scs15 = 15,
    /// 30 kHz
    Scs30 = 30,
    /// 60 kHz
    Scs60 = 60,
    /// 120 kHz
    Scs120 = 120,
    /// 240 kHz
    Scs240 = 240,
}

impl SubcarrierSpacing {
    /// Get the numerology index mu (15 kHz * 2^mu, 3GPP TS 38.211)
    pub fn to_numerology(self) -> u8 {
        match self {
            SubcarrierSpacing::Scs15 => 0,
            SubcarrierSpacing::Scs30 => 1,
            SubcarrierSpacing::Scs60 => 2,
            SubcarrierSpacing::Scs120 => 3,
            SubcarrierSpacing::Scs240 => 4,
        }
    }

    /// Get the subcarrier spacing for a numerology index
    pub fn from_numerology(mu: u8) -> Option<Self> {
        match mu {
            0 => Some(SubcarrierSpacing::Scs15),
            1 => Some(SubcarrierSpacing::Scs30),
            2 => Some(SubcarrierSpacing::Scs60),
            3 => Some(SubcarrierSpacing::Scs120),
            4 => Some(SubcarrierSpacing::Scs240),
            _ => None,
        }
    }

    /// Get the spacing in kHz
    pub fn khz(self) -> u16 {
        self as u16
    }

    /// Number of slots per subframe (1 ms) for this spacing
    pub fn slots_per_subframe(self) -> u32 {
        1 << self.to_numerology()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pci_validation() {
        assert!(Pci::new(0).is_some());
        assert!(Pci::new(1007).is_some());
        assert!(Pci::new(1008).is_none());
    }

    #[test]
    fn test_numerology_conversion() {
        assert_eq!(SubcarrierSpacing::Scs15.to_numerology(), 0);
        assert_eq!(SubcarrierSpacing::Scs240.to_numerology(), 4);
        assert_eq!(
            SubcarrierSpacing::from_numerology(1),
            Some(SubcarrierSpacing::Scs30)
        );
        assert_eq!(SubcarrierSpacing::from_numerology(5), None);
    }

    #[test]
    fn test_slots_per_subframe() {
        assert_eq!(SubcarrierSpacing::Scs15.slots_per_subframe(), 1);
        assert_eq!(SubcarrierSpacing::Scs30.slots_per_subframe(), 2);
        assert_eq!(SubcarrierSpacing::Scs120.slots_per_subframe(), 8);
    }
}
