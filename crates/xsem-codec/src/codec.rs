use bytes::{Buf, BufMut, BytesMut};
use xsem_transport::{IpiMessage, IPI_MSG_LEN};

use crate::command::Command;
use crate::error::{CodecError, Result};

/// Maximum number of arguments after the header.
pub const MAX_ARGS: usize = 4;

/// Completion code the mailbox reports for a delivered request.
pub const COMPLETION_SUCCESS: u32 = 0;

/// Size of one message on a byte stream: eight little-endian words.
pub const MESSAGE_SIZE: usize = IPI_MSG_LEN * 4;

/// An outbound request, built fresh for every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    command: Command,
    words: IpiMessage,
}

impl Request {
    /// The command this request carries.
    pub fn command(&self) -> Command {
        self.command
    }

    /// Header word (slot 0).
    pub fn header(&self) -> u32 {
        self.words[0]
    }

    /// Argument slots 1..=4, zero where unused.
    pub fn args(&self) -> &[u32] {
        &self.words[1..=MAX_ARGS]
    }

    /// Number of arguments the header announces.
    pub fn arg_count(&self) -> usize {
        ((self.words[0] >> 16) as usize).saturating_sub(1)
    }

    /// The full message buffer in wire order.
    pub fn as_words(&self) -> &IpiMessage {
        &self.words
    }
}

/// Build a request for `command` with up to [`MAX_ARGS`] arguments.
///
/// Arguments are copied verbatim into slots 1..; unused slots stay zero.
pub fn pack(command: Command, args: &[u32]) -> Result<Request> {
    if args.len() > MAX_ARGS {
        return Err(CodecError::TooManyArgs {
            count: args.len(),
            max: MAX_ARGS,
        });
    }

    let mut words = [0u32; IPI_MSG_LEN];
    words[0] = command.header(args.len() as u32 + 1);
    words[1..=args.len()].copy_from_slice(args);

    Ok(Request { command, words })
}

/// A raw inbound reply buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    words: IpiMessage,
}

impl Response {
    /// Wrap a reply buffer as read from the mailbox.
    pub fn from_words(words: IpiMessage) -> Self {
        Self { words }
    }

    /// Completion code (slot 0).
    pub fn completion(&self) -> u32 {
        self.words[0]
    }

    /// True when the completion code is the success sentinel.
    pub fn is_success(&self) -> bool {
        self.completion() == COMPLETION_SUCCESS
    }

    /// The full reply buffer in wire order.
    pub fn as_words(&self) -> &IpiMessage {
        &self.words
    }
}

/// Reply words 1..=4 of a response whose completion code was success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplyFields {
    /// Acknowledgment id (word 1).
    pub ack_id: u32,
    /// Command-specific words 2..=4.
    pub data: [u32; 3],
}

impl ReplyFields {
    /// True when the acknowledgment id names `command`.
    pub fn acknowledges(&self, command: Command) -> bool {
        self.ack_id & 0xFFFF == command.ack_key()
    }
}

/// Check the completion code and expose the reply fields.
///
/// Field values beyond the completion code are not interpreted here.
pub fn validate(response: &Response) -> Result<ReplyFields> {
    if !response.is_success() {
        return Err(CodecError::Completion {
            code: response.completion(),
        });
    }

    let words = response.as_words();
    Ok(ReplyFields {
        ack_id: words[1],
        data: [words[2], words[3], words[4]],
    })
}

/// Encode a message buffer for a byte-oriented mailbox.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────┬─────┬──────────┐
/// │ word 0   │ word 1   │ ... │ word 7   │
/// │ (4B LE)  │ (4B LE)  │     │ (4B LE)  │
/// └──────────┴──────────┴─────┴──────────┘
/// ```
pub fn encode_message(words: &IpiMessage, dst: &mut BytesMut) {
    dst.reserve(MESSAGE_SIZE);
    for word in words {
        dst.put_u32_le(*word);
    }
}

/// Decode one message buffer.
///
/// Returns `None` if the buffer doesn't hold a complete message yet. On
/// success, consumes the message bytes from the buffer.
pub fn decode_message(src: &mut BytesMut) -> Option<IpiMessage> {
    if src.len() < MESSAGE_SIZE {
        return None;
    }

    let mut words = [0u32; IPI_MSG_LEN];
    for word in words.iter_mut() {
        *word = src.get_u32_le();
    }
    Some(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_places_header_and_args() {
        let request = pack(Command::CramInjectError, &[0x0010_0100, 12, 64, 5]).unwrap();

        assert_eq!(request.header(), 0x50304);
        assert_eq!(request.args(), &[0x0010_0100, 12, 64, 5]);
        assert_eq!(request.arg_count(), 4);
        assert_eq!(&request.as_words()[5..], &[0, 0, 0]);
    }

    #[test]
    fn pack_zero_pads_unused_slots() {
        for count in 0..=MAX_ARGS {
            let args: Vec<u32> = (1..=count as u32).map(|i| 0xC0DE_0000 | i).collect();
            let request = pack(Command::EventRegister, &args).unwrap();

            assert_eq!(request.arg_count(), count);
            assert_eq!(&request.args()[..count], args.as_slice());
            assert!(request.args()[count..].iter().all(|w| *w == 0));
            assert_eq!(request.command(), Command::EventRegister);
        }
    }

    #[test]
    fn pack_rejects_fifth_argument() {
        let result = pack(Command::CramInit, &[1, 2, 3, 4, 5]);
        assert!(matches!(
            result,
            Err(CodecError::TooManyArgs { count: 5, max: 4 })
        ));
    }

    #[test]
    fn validate_exposes_reply_words() {
        let response = Response::from_words([0, 0x3030A, 0xAA, 0xBB, 0xCC, 9, 9, 9]);
        let fields = validate(&response).unwrap();

        assert_eq!(fields.ack_id, 0x3030A);
        assert_eq!(fields.data, [0xAA, 0xBB, 0xCC]);
        assert!(fields.acknowledges(Command::CramReadFrameEcc));
        assert!(!fields.acknowledges(Command::GetConfig));
    }

    #[test]
    fn validate_rejects_failed_completion() {
        let response = Response::from_words([0x15, 0x10302, 0, 0, 0, 0, 0, 0]);
        assert!(!response.is_success());
        assert!(matches!(
            validate(&response),
            Err(CodecError::Completion { code: 0x15 })
        ));
    }

    #[test]
    fn encode_decode_message_on_byte_stream() {
        let request = pack(Command::CramReadFrameEcc, &[0x0020_0003, 2]).unwrap();
        let mut buf = BytesMut::new();
        encode_message(request.as_words(), &mut buf);

        assert_eq!(buf.len(), MESSAGE_SIZE);
        assert_eq!(&buf[..4], &0x3030Au32.to_le_bytes());

        let words = decode_message(&mut buf).unwrap();
        assert_eq!(&words, request.as_words());
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_incomplete_message() {
        let mut buf = BytesMut::from(&[0u8; MESSAGE_SIZE - 1][..]);
        assert!(decode_message(&mut buf).is_none());
        assert_eq!(buf.len(), MESSAGE_SIZE - 1);
    }
}
