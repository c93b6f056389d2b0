//! CRAM and NPI attribute registers returned by the get-configuration
//! command.
//!
//! The client relays these words untouched; the accessors here are a
//! convenience for callers that want the sub-fields.

use serde::Serialize;

/// When the scan starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoStart {
    /// Scan is started explicitly by a command.
    Manual,
    /// Scan starts automatically after device configuration.
    AfterConfiguration,
    Reserved(u32),
}

impl AutoStart {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0b00 => Self::Manual,
            0b01 => Self::AfterConfiguration,
            other => Self::Reserved(other),
        }
    }
}

/// CRAM scan mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    Disabled,
    Enabled,
    Reserved(u32),
}

/// CRAM attribute register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CramAttributes(pub u32);

impl CramAttributes {
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Bits [1:0].
    pub fn scan_mode(self) -> ScanMode {
        match self.0 & 0x3 {
            0b00 => ScanMode::Disabled,
            0b10 => ScanMode::Enabled,
            other => ScanMode::Reserved(other),
        }
    }

    /// Bit [2]: correctable errors are corrected.
    pub fn correction_enabled(self) -> bool {
        self.0 & (1 << 2) != 0
    }

    /// Bit [3]: ECC comes from tools (CDO) instead of hardware.
    pub fn software_ecc(self) -> bool {
        self.0 & (1 << 3) != 0
    }

    /// Bits [6:5].
    pub fn auto_start(self) -> AutoStart {
        AutoStart::from_bits((self.0 >> 5) & 0x3)
    }
}

/// NPI attribute register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct NpiAttributes(pub u32);

impl NpiAttributes {
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Bit [2]: SHA is calculated in software.
    pub fn software_sha(self) -> bool {
        self.0 & (1 << 2) != 0
    }

    /// Bits [5:4].
    pub fn auto_start(self) -> AutoStart {
        AutoStart::from_bits((self.0 >> 4) & 0x3)
    }

    /// Bits [17:8]: periodic scan interval in milliseconds (default 100).
    pub fn scan_interval_ms(self) -> u32 {
        (self.0 >> 8) & 0x3FF
    }
}
