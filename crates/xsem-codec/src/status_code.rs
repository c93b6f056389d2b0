//! CRAM error codes.
//!
//! The same 5-bit code space is used for the error-code field of the CRAM
//! status word and for the primary status the server returns to CRAM
//! commands.

use std::fmt;

use serde::Serialize;

/// Reason code reported by the CRAM scan engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CramErrorCode {
    /// CRC error while CRAM was not in observation state.
    UnexpectedCrc,
    /// ECC error while CRAM was not in observation or initialization state.
    UnexpectedEcc,
    /// Safety register write failed in the SEU handler.
    SafetyWrite,
    /// ECC/CRC interrupt raised but no row reported it.
    IsrRowNotFound,
    /// CRAM initialization has not been done.
    InitNotDone,
    /// Start scan failed.
    StartScanFailed,
    /// Stop scan failed.
    StopScanFailed,
    /// Injection row is out of range.
    InvalidRow,
    /// Injection quadword is out of range.
    InvalidQword,
    /// Injection bit is out of range.
    InvalidBit,
    /// Injection frame address is out of range.
    InvalidFrameAddress,
    /// A bit other than the targeted one flipped during injection.
    UnexpectedBitFlip,
    /// The targeted bit is masked.
    MaskedBit,
    /// Injection block type is invalid.
    InvalidBlockType,
    /// CRC, uncorrectable or uncorrected correctable error is active.
    ErrorActive,
    /// ECC or CRC error during calibration with software ECC.
    CalibrationError,
    /// Any code outside the documented set.
    Reserved(u32),
}

impl CramErrorCode {
    /// Decode a status code. `0` means no error.
    pub fn from_code(code: u32) -> Option<Self> {
        let decoded = match code {
            0x00 => return None,
            0x01 => Self::UnexpectedCrc,
            0x02 => Self::UnexpectedEcc,
            0x03 => Self::SafetyWrite,
            0x04 => Self::IsrRowNotFound,
            0x05 => Self::InitNotDone,
            0x06 => Self::StartScanFailed,
            0x07 => Self::StopScanFailed,
            0x08 => Self::InvalidRow,
            0x09 => Self::InvalidQword,
            0x0A => Self::InvalidBit,
            0x0B => Self::InvalidFrameAddress,
            0x0C => Self::UnexpectedBitFlip,
            0x0D => Self::MaskedBit,
            0x0E => Self::InvalidBlockType,
            0x0F => Self::ErrorActive,
            0x10 => Self::CalibrationError,
            other => Self::Reserved(other),
        };
        Some(decoded)
    }

    /// Numeric code as it appears on the wire.
    pub fn code(self) -> u32 {
        match self {
            Self::UnexpectedCrc => 0x01,
            Self::UnexpectedEcc => 0x02,
            Self::SafetyWrite => 0x03,
            Self::IsrRowNotFound => 0x04,
            Self::InitNotDone => 0x05,
            Self::StartScanFailed => 0x06,
            Self::StopScanFailed => 0x07,
            Self::InvalidRow => 0x08,
            Self::InvalidQword => 0x09,
            Self::InvalidBit => 0x0A,
            Self::InvalidFrameAddress => 0x0B,
            Self::UnexpectedBitFlip => 0x0C,
            Self::MaskedBit => 0x0D,
            Self::InvalidBlockType => 0x0E,
            Self::ErrorActive => 0x0F,
            Self::CalibrationError => 0x10,
            Self::Reserved(code) => code,
        }
    }

    /// Short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::UnexpectedCrc => "unexpected CRC error outside observation state",
            Self::UnexpectedEcc => "unexpected ECC error outside observation or init state",
            Self::SafetyWrite => "safety write error in SEU handler",
            Self::IsrRowNotFound => "ECC/CRC ISR not found in any row",
            Self::InitNotDone => "CRAM initialization not done",
            Self::StartScanFailed => "CRAM start scan failure",
            Self::StopScanFailed => "CRAM stop scan failure",
            Self::InvalidRow => "invalid row for error injection",
            Self::InvalidQword => "invalid quadword for error injection",
            Self::InvalidBit => "invalid bit for error injection",
            Self::InvalidFrameAddress => "invalid frame address for error injection",
            Self::UnexpectedBitFlip => "unexpected bit flip during error injection",
            Self::MaskedBit => "masked bit during error injection",
            Self::InvalidBlockType => "invalid block type for error injection",
            Self::ErrorActive => "CRC or uncorrectable error active in CRAM",
            Self::CalibrationError => "ECC or CRC error during calibration (SW ECC)",
            Self::Reserved(_) => "reserved error code",
        }
    }
}

impl fmt::Display for CramErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04x})", self.description(), self.code())
    }
}
