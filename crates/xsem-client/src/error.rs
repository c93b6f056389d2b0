/// Errors that can occur in client operations.
///
/// A remote engine rejecting an operation is not an error here; it shows up
/// as a non-zero status in the returned reply.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A required argument was missing or null.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The request was not delivered or no reply arrived.
    #[error("transport error: {0}")]
    Transport(#[from] xsem_transport::TransportError),

    /// The reply could not be trusted.
    #[error("codec error: {0}")]
    Codec(#[from] xsem_codec::CodecError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
