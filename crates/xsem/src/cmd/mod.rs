use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod config;
pub mod cram;
pub mod event;
pub mod ipi;
pub mod mem;
pub mod npi;
pub mod registers;
pub mod status;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// CRAM scan control, error injection and frame ECC.
    #[command(subcommand)]
    Cram(CramCommand),
    /// NPI scan control, error injection and golden SHA.
    #[command(subcommand)]
    Npi(NpiCommand),
    /// Read the CRAM and NPI configuration.
    Config(DeviceArgs),
    /// Enable or disable event notification.
    Event(EventArgs),
    /// Read the status the server publishes in PMC RAM.
    #[command(subcommand)]
    Status(StatusCommand),
    /// Print the frame count of each block type in a row.
    Frames(RowArgs),
    /// Print the golden CRC of a row.
    Crc(RowArgs),
    /// Print the number of CFRAME rows.
    Rows(MemArgs),
    /// Show version information.
    Version(VersionArgs),
}

#[derive(Subcommand, Debug)]
pub enum CramCommand {
    /// Initialize the CRAM scan.
    Init(DeviceArgs),
    /// Start the CRAM scan.
    Start(DeviceArgs),
    /// Stop the CRAM scan.
    Stop(DeviceArgs),
    /// Inject a single-bit error.
    Inject(CramInjectArgs),
    /// Read the ECC of one frame.
    Ecc(CramEccArgs),
}

#[derive(Subcommand, Debug)]
pub enum NpiCommand {
    /// Start the NPI scan.
    Start(DeviceArgs),
    /// Stop the NPI scan.
    Stop(DeviceArgs),
    /// Corrupt the SHA of the first descriptor.
    Inject(DeviceArgs),
    /// Copy the golden SHA values into a buffer owned by the caller.
    Sha(NpiShaArgs),
}

#[derive(Subcommand, Debug)]
pub enum StatusCommand {
    /// CRAM scan status and last corrected errors.
    Cram(MemArgs),
    /// NPI scan status and counters.
    Npi(MemArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Cram(command) => cram::run(command, format),
        Command::Npi(command) => npi::run(command, format),
        Command::Config(args) => config::run(args, format),
        Command::Event(args) => event::run(args, format),
        Command::Status(command) => status::run(command, format),
        Command::Frames(args) => registers::frames(args, format),
        Command::Crc(args) => registers::crc(args, format),
        Command::Rows(args) => registers::rows(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// IPI mailbox device, or a Unix socket of a mailbox proxy.
    #[arg(long, env = "XSEM_DEVICE", value_name = "PATH")]
    pub device: PathBuf,
    /// Reply timeout on proxy sockets (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
    /// Accept replies whose acknowledgment id does not match the request.
    #[arg(long)]
    pub no_ack_check: bool,
}

#[derive(Args, Debug)]
pub struct MemArgs {
    /// Physical memory device.
    #[arg(long, env = "XSEM_MEM", value_name = "PATH", default_value = "/dev/mem")]
    pub mem: PathBuf,
}

#[derive(Args, Debug)]
pub struct RowArgs {
    /// CFRAME row index.
    #[arg(value_parser = parse_u32)]
    pub row: u32,
    #[command(flatten)]
    pub mem: MemArgs,
}

#[derive(Args, Debug)]
pub struct CramInjectArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Row index.
    #[arg(long, value_parser = parse_u32)]
    pub row: u32,
    /// Frame number within the block.
    #[arg(long, value_parser = parse_u32)]
    pub frame: u32,
    /// Block type (0-6).
    #[arg(long, value_parser = parse_u32, default_value = "0")]
    pub block_type: u32,
    /// Quad word (0-24); 12 holds ECC bits only.
    #[arg(long, value_parser = parse_u32, default_value = "12")]
    pub qword: u32,
    /// Bit position (0-127).
    #[arg(long, value_parser = parse_u32)]
    pub bit: u32,
}

#[derive(Args, Debug)]
pub struct CramEccArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Row index.
    #[arg(long, value_parser = parse_u32)]
    pub row: u32,
    /// Frame number within the block.
    #[arg(long, value_parser = parse_u32)]
    pub frame: u32,
    /// Block type (0-6).
    #[arg(long, value_parser = parse_u32, default_value = "0")]
    pub block_type: u32,
}

#[derive(Args, Debug)]
pub struct NpiShaArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Address of the descriptor buffer that receives the SHA values.
    #[arg(long, value_parser = parse_u32)]
    pub buffer: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModuleArg {
    Cram,
    Npi,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EventArg {
    /// Uncorrectable ECC error (CRAM).
    Ue,
    /// Correctable ECC error (CRAM).
    Ce,
    /// CRC error (CRAM) or SHA mismatch (NPI).
    Crc,
    /// Internal error.
    Internal,
}

#[derive(Args, Debug)]
pub struct EventArgs {
    #[command(flatten)]
    pub device: DeviceArgs,
    /// Module the events belong to.
    #[arg(value_enum)]
    pub module: ModuleArg,
    /// Events to (un)subscribe, comma-separated.
    #[arg(long, value_enum, value_delimiter = ',', required = true)]
    pub events: Vec<EventArg>,
    /// Turn notification off instead of on.
    #[arg(long)]
    pub disable: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Decimal or `0x`-prefixed hexadecimal.
pub fn parse_u32(input: &str) -> Result<u32, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => input.replace('_', "").parse(),
    };
    parsed.map_err(|err| format!("invalid number {input:?}: {err}"))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_u32_accepts_hex_and_decimal() {
        assert_eq!(parse_u32("12"), Ok(12));
        assert_eq!(parse_u32("0x100"), Ok(0x100));
        assert_eq!(parse_u32("0XF201_4000"), Ok(0xF201_4000));
        assert!(parse_u32("0x1_0000_0000").is_err());
        assert!(parse_u32("row").is_err());
    }

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
    }
}
