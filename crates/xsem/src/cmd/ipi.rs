use std::path::Path;

use serde::Serialize;
use tracing::debug;
use xsem_client::{ClientConfig, Command, IpiResponse, SemClient};
use xsem_codec::{StreamChannel, StreamConfig};
use xsem_transport::IpiChannel;

use crate::cmd::{parse_duration, DeviceArgs};
use crate::exit::{status_code, transport_error, CliResult};
use crate::output::{flag, hex, print_record, Fields, OutputFormat};

pub type Client = SemClient<Box<dyn IpiChannel>>;

/// Open the mailbox named by `--device`.
///
/// Unix sockets are treated as a mailbox proxy and get the reply timeout;
/// anything else is opened as a character device.
pub fn open_client(args: &DeviceArgs) -> CliResult<Client> {
    let timeout = parse_duration(&args.timeout)?;
    let channel: Box<dyn IpiChannel> = if is_socket(&args.device) {
        debug!(device = ?args.device, ?timeout, "connecting to mailbox proxy");
        let config = StreamConfig {
            read_timeout: Some(timeout),
            write_timeout: Some(timeout),
        };
        Box::new(connect(&args.device, config)?)
    } else {
        debug!(device = ?args.device, "opening mailbox device");
        Box::new(
            StreamChannel::open(&args.device)
                .map_err(|err| transport_error("open failed", err))?,
        )
    };

    let config = ClientConfig {
        check_ack: !args.no_ack_check,
    };
    Ok(SemClient::with_config(channel, config))
}

#[cfg(unix)]
fn is_socket(path: &Path) -> bool {
    use std::os::unix::fs::FileTypeExt;

    std::fs::metadata(path)
        .map(|meta| meta.file_type().is_socket())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_socket(_path: &Path) -> bool {
    false
}

#[cfg(unix)]
fn connect(
    path: &Path,
    config: StreamConfig,
) -> CliResult<StreamChannel<std::os::unix::net::UnixStream>> {
    StreamChannel::connect(path, config).map_err(|err| transport_error("connect failed", err))
}

#[cfg(not(unix))]
fn connect(path: &Path, _config: StreamConfig) -> CliResult<StreamChannel<std::fs::File>> {
    StreamChannel::open(path).map_err(|err| transport_error("open failed", err))
}

#[derive(Serialize)]
struct ReplyOutput {
    command: &'static str,
    ack_id: u32,
    status: u32,
    accepted: bool,
    /// Set for CRAM commands whose status names a known reason.
    reason: Option<String>,
    response: IpiResponse,
}

fn is_cram(command: Command) -> bool {
    matches!(
        command,
        Command::CramInit
            | Command::CramStartScan
            | Command::CramStopScan
            | Command::CramInjectError
    )
}

/// Print a status-only reply and return the exit code it maps to.
pub fn print_reply(command: Command, response: &IpiResponse, format: OutputFormat) -> i32 {
    let reason = if is_cram(command) {
        response.cram_error().map(|code| code.description().to_string())
    } else {
        None
    };

    let mut fields: Fields = vec![
        ("command", command.name().to_string()),
        ("ack_id", hex(response.ack_id())),
        ("status", hex(response.status())),
        ("accepted", flag(response.is_accepted())),
    ];
    if let Some(reason) = &reason {
        fields.push(("reason", reason.clone()));
    }

    let out = ReplyOutput {
        command: command.name(),
        ack_id: response.ack_id(),
        status: response.status(),
        accepted: response.is_accepted(),
        reason,
        response: *response,
    };
    print_record(&out, &fields, format);
    status_code(response.status())
}
