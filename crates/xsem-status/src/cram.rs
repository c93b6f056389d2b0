use serde::Serialize;
use xsem_codec::CramErrorCode;

use crate::layout::MAX_CRAM_ERROR_LOCATIONS;

/// Outcome of the last correctable ECC error (status bits [15:14]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectableOutcome {
    None,
    Corrected,
    /// Detected while correction is disabled.
    DetectedNotCorrected,
    Reserved,
}

impl CorrectableOutcome {
    fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0b00 => Self::None,
            0b01 => Self::Corrected,
            0b10 => Self::DetectedNotCorrected,
            _ => Self::Reserved,
        }
    }
}

/// CRAM status word, decoded.
///
/// Every field mirrors its bit range in `raw`; combinations are not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CramStatusWord {
    pub raw: u32,
    /// Bit 0: CRAM scan is included in the design.
    pub scan_included: bool,
    pub init_state: bool,
    pub observation_state: bool,
    pub correction_state: bool,
    pub idle_state: bool,
    pub injection_state: bool,
    /// Bit 6: fatal/error state.
    pub fatal_state: bool,
    pub calibration_timeout: bool,
    /// Bit 8: start-up test failure.
    pub startup_failure: bool,
    pub uncorrectable_ecc: bool,
    pub crc_error: bool,
    pub correctable_ecc: bool,
    pub invalid_error_location: bool,
    pub internal_error: bool,
    pub correctable_outcome: CorrectableOutcome,
    /// Bit 16.
    pub init_complete: bool,
    /// Bit 17: scan is disabled in the design.
    pub scan_disabled: bool,
    /// Bits [24:20].
    pub error_code: Option<CramErrorCode>,
}

impl CramStatusWord {
    pub fn decode(raw: u32) -> Self {
        let bit = |n: u32| raw & (1 << n) != 0;
        Self {
            raw,
            scan_included: bit(0),
            init_state: bit(1),
            observation_state: bit(2),
            correction_state: bit(3),
            idle_state: bit(4),
            injection_state: bit(5),
            fatal_state: bit(6),
            calibration_timeout: bit(7),
            startup_failure: bit(8),
            uncorrectable_ecc: bit(9),
            crc_error: bit(10),
            correctable_ecc: bit(11),
            invalid_error_location: bit(12),
            internal_error: bit(13),
            correctable_outcome: CorrectableOutcome::from_bits(raw >> 14),
            init_complete: bit(16),
            scan_disabled: bit(17),
            error_code: CramErrorCode::from_code((raw >> 20) & 0x1F),
        }
    }
}

/// Validity of a corrected-error address (low word bits [1:0]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressValidity {
    Unavailable,
    OutOfRange,
    Reserved,
    Valid,
}

/// One of the last corrected CRAM errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorrectedError {
    pub raw_low: u32,
    pub raw_high: u32,
    pub validity: AddressValidity,
    /// Low word bits [27:23].
    pub qword: u32,
    /// Low word bits [22:16].
    pub bit: u32,
    /// High word bits [26:23].
    pub row: u32,
    /// High word bits [22:20].
    pub block_type: u32,
    /// High word bits [19:0].
    pub frame: u32,
}

impl CorrectedError {
    pub fn decode(low: u32, high: u32) -> Self {
        let validity = match low & 0x3 {
            0b00 => AddressValidity::Unavailable,
            0b01 => AddressValidity::OutOfRange,
            0b10 => AddressValidity::Reserved,
            _ => AddressValidity::Valid,
        };
        Self {
            raw_low: low,
            raw_high: high,
            validity,
            qword: (low >> 23) & 0x1F,
            bit: (low >> 16) & 0x7F,
            row: (high >> 23) & 0xF,
            block_type: (high >> 20) & 0x7,
            frame: high & 0x000F_FFFF,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validity == AddressValidity::Valid
    }
}

/// CRAM scan status block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CramStatus {
    pub status: CramStatusWord,
    /// Last corrected errors, when correction is enabled in the design.
    pub error_locations: [CorrectedError; MAX_CRAM_ERROR_LOCATIONS],
    /// Count of corrected bits.
    pub corrected_bits: u32,
}
