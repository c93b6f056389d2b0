use std::fmt;
use std::io;

use xsem_client::ClientError;
use xsem_codec::CodecError;
use xsem_status::StatusError;
use xsem_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Exit code for a reply the server answered: zero status succeeds.
pub fn status_code(status: u32) -> i32 {
    if status == 0 {
        SUCCESS
    } else {
        FAILURE
    }
}

fn io_code(kind: io::ErrorKind) -> i32 {
    match kind {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => TRANSPORT_ERROR,
        _ => INTERNAL,
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(io_code(err.kind()), format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { ref source, .. } | TransportError::Map { ref source, .. } => {
            CliError::new(io_code(source.kind()), format!("{context}: {err}"))
        }
        TransportError::Io(source) => io_error(context, source),
        TransportError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        TransportError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
        TransportError::Unmapped { .. } | TransportError::Misaligned { .. } => {
            CliError::new(INTERNAL, format!("{context}: {err}"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn codec_error(context: &str, err: CodecError) -> CliError {
    match err {
        CodecError::Completion { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        CodecError::TooManyArgs { .. } => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::InvalidArgument(_) => CliError::new(USAGE, format!("{context}: {err}")),
        ClientError::Transport(err) => transport_error(context, err),
        ClientError::Codec(err) => codec_error(context, err),
    }
}

pub fn status_error(context: &str, err: StatusError) -> CliError {
    match err {
        StatusError::Memory(err) => transport_error(context, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_status_maps_to_failure() {
        assert_eq!(status_code(0), SUCCESS);
        assert_eq!(status_code(0x0D), FAILURE);
    }

    #[test]
    fn transport_errors_keep_their_class() {
        let timeout = transport_error(
            "receive",
            TransportError::Timeout(std::time::Duration::from_secs(1)),
        );
        assert_eq!(timeout.code, TIMEOUT);

        let denied = transport_error(
            "open",
            TransportError::Open {
                path: "/dev/mem".into(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            },
        );
        assert_eq!(denied.code, PERMISSION_DENIED);
        assert!(denied.message.contains("/dev/mem"));

        let missing = transport_error(
            "open",
            TransportError::Open {
                path: "/dev/ipi".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        );
        assert_eq!(missing.code, TRANSPORT_ERROR);
    }

    #[test]
    fn client_errors_unwrap_layers() {
        let usage = client_error("sha", ClientError::InvalidArgument("buffer address is null"));
        assert_eq!(usage.code, USAGE);

        let completion = client_error(
            "start",
            ClientError::Codec(CodecError::Completion { code: 0x11 }),
        );
        assert_eq!(completion.code, DATA_INVALID);

        let closed = client_error("start", ClientError::Transport(TransportError::Closed));
        assert_eq!(closed.code, FAILURE);
    }
}
