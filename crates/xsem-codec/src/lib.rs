//! XilSEM IPI request/response payload codec.
//!
//! Every request is one IPI message buffer of [`IPI_MSG_LEN`] words:
//! - word 0: header `(len << 16) | (module << 8) | api_id`
//! - words 1..=4: command arguments, zero padded
//!
//! Every response carries a completion code in word 0, the acknowledgment id
//! in word 1 and up to three command-specific words after it. Nothing in a
//! response is trusted until the completion code has been checked.

pub mod codec;
pub mod command;
pub mod error;
pub mod status_code;
pub mod stream;

pub use codec::{
    decode_message, encode_message, pack, validate, ReplyFields, Request, Response,
    COMPLETION_SUCCESS, MAX_ARGS, MESSAGE_SIZE,
};
pub use command::{Command, XSEM_MODULE_ID};
pub use error::{CodecError, Result};
pub use status_code::CramErrorCode;
pub use stream::{StreamChannel, StreamConfig};
pub use xsem_transport::{IpiMessage, IPI_MSG_LEN};
