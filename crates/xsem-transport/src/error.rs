use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur while talking to the management controller.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the device backing a channel or memory window.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to map a physical memory window.
    #[error("failed to map {len:#x} bytes at {base:#x}: {source}")]
    Map {
        base: u64,
        len: usize,
        source: std::io::Error,
    },

    /// The address is not covered by any mapped window.
    #[error("address {addr:#x} is outside every mapped window")]
    Unmapped { addr: u64 },

    /// The address is not 32-bit aligned.
    #[error("address {addr:#x} is not 32-bit aligned")]
    Misaligned { addr: u64 },

    /// An I/O error occurred on the mailbox.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The mailbox was closed before a complete message was exchanged.
    #[error("channel closed (incomplete message)")]
    Closed,

    /// The remote controller did not answer in time.
    #[error("no reply within {0:?}")]
    Timeout(Duration),

    /// The transport has been shut down.
    #[error("transport shut down")]
    Shutdown,
}

pub type Result<T> = std::result::Result<T, TransportError>;
