/// Errors that can occur while building requests or checking replies.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The mailbox reported a non-success completion code.
    #[error("remote completion code {code:#x} (expected 0x0)")]
    Completion { code: u32 },

    /// More arguments than a request buffer can carry.
    #[error("too many request arguments ({count}, max {max})")]
    TooManyArgs { count: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, CodecError>;
