//! Command identifiers understood by the XilSEM server.
//!
//! Api ids 0x01-0x0A are contiguous; 0x10 (golden SHA) was added later and
//! sits apart from the rest.

use std::fmt;

/// Module id of the XilSEM library inside the platform loader.
pub const XSEM_MODULE_ID: u32 = 0x03;

/// One remote capability of the XilSEM server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Command {
    /// CRAM scan initialization.
    CramInit = 0x01,
    /// Start CRAM scan.
    CramStartScan = 0x02,
    /// Stop CRAM scan.
    CramStopScan = 0x03,
    /// Inject a bit flip into CRAM.
    CramInjectError = 0x04,
    /// Start NPI scan.
    NpiStartScan = 0x05,
    /// Stop NPI scan.
    NpiStopScan = 0x06,
    /// Inject (or undo) a SHA error in the first NPI descriptor.
    NpiInjectError = 0x07,
    /// Register or unregister an event notification.
    EventRegister = 0x08,
    /// Read CRAM and NPI attribute registers.
    GetConfig = 0x09,
    /// Read the ECC of one CRAM frame.
    CramReadFrameEcc = 0x0A,
    /// Copy golden SHA and descriptor information into a caller buffer.
    NpiGoldenSha = 0x10,
}

impl Command {
    /// Every command, in api id order.
    pub const ALL: [Command; 11] = [
        Command::CramInit,
        Command::CramStartScan,
        Command::CramStopScan,
        Command::CramInjectError,
        Command::NpiStartScan,
        Command::NpiStopScan,
        Command::NpiInjectError,
        Command::EventRegister,
        Command::GetConfig,
        Command::CramReadFrameEcc,
        Command::NpiGoldenSha,
    ];

    /// Api id as carried in the low byte of the header.
    pub const fn api_id(self) -> u32 {
        self as u32
    }

    /// Request header for a payload of `len` words (header included).
    pub const fn header(self, len: u32) -> u32 {
        (len << 16) | (XSEM_MODULE_ID << 8) | self.api_id()
    }

    /// The part of an acknowledgment id that identifies the command.
    ///
    /// The server echoes `(len << 16) | (module << 8) | api_id`, where `len`
    /// follows the server's own reply layout, so only the low 16 bits are
    /// stable.
    pub const fn ack_key(self) -> u32 {
        (XSEM_MODULE_ID << 8) | self.api_id()
    }

    /// Look up a command by api id.
    pub fn from_api_id(api_id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.api_id() == api_id)
    }

    /// Identify the command a header or acknowledgment id refers to.
    pub fn from_header(word: u32) -> Option<Self> {
        if (word >> 8) & 0xFF != XSEM_MODULE_ID {
            return None;
        }
        Self::from_api_id(word & 0xFF)
    }

    /// Human-readable command name.
    pub fn name(self) -> &'static str {
        match self {
            Command::CramInit => "cram_init",
            Command::CramStartScan => "cram_start_scan",
            Command::CramStopScan => "cram_stop_scan",
            Command::CramInjectError => "cram_inject_error",
            Command::NpiStartScan => "npi_start_scan",
            Command::NpiStopScan => "npi_stop_scan",
            Command::NpiInjectError => "npi_inject_error",
            Command::EventRegister => "event_register",
            Command::GetConfig => "get_config",
            Command::CramReadFrameEcc => "cram_read_frame_ecc",
            Command::NpiGoldenSha => "npi_golden_sha",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches_documented_ack_ids() {
        assert_eq!(Command::CramInit.header(1), 0x10301);
        assert_eq!(Command::CramStartScan.header(1), 0x10302);
        assert_eq!(Command::NpiStopScan.header(1), 0x10306);
        assert_eq!(Command::CramReadFrameEcc.header(3), 0x3030A);
        assert_eq!(Command::NpiGoldenSha.header(1), 0x10310);
    }

    #[test]
    fn from_header_ignores_length_field() {
        assert_eq!(Command::from_header(0x10304), Some(Command::CramInjectError));
        assert_eq!(Command::from_header(0x50304), Some(Command::CramInjectError));
        assert_eq!(Command::from_header(0x30309), Some(Command::GetConfig));
    }

    #[test]
    fn from_header_rejects_foreign_module_and_unknown_api() {
        assert_eq!(Command::from_header(0x10402), None);
        assert_eq!(Command::from_header(0x1030B), None);
        assert_eq!(Command::from_api_id(0), None);
    }

    #[test]
    fn api_ids_are_unique() {
        for (i, a) in Command::ALL.iter().enumerate() {
            for b in &Command::ALL[i + 1..] {
                assert_ne!(a.api_id(), b.api_id());
            }
        }
    }
}
