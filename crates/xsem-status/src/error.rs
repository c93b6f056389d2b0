/// Errors that can occur while reading status or registers.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// The memory access itself failed.
    #[error("memory read failed: {0}")]
    Memory(#[from] xsem_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, StatusError>;
