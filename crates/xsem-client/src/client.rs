use tracing::{debug, warn};
use xsem_codec::{pack, validate, Command, ReplyFields, Response};
use xsem_transport::IpiChannel;

use crate::error::{ClientError, Result};
use crate::inject::{ErrorInjection, FrameAddress};
use crate::notifier::Notifier;
use crate::reply::{FrameEcc, IpiResponse, SemConfig};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Log a warning when the acknowledgment id does not name the command
    /// that was sent. The reply is returned either way.
    pub check_ack: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { check_ack: true }
    }
}

/// XilSEM command client.
///
/// Holds no session state: every method is one blocking round trip, and
/// sequencing rules (init before start, and so on) are enforced by the
/// server.
pub struct SemClient<C> {
    channel: C,
    config: ClientConfig,
}

impl<C: IpiChannel> SemClient<C> {
    /// Create a client with default configuration.
    pub fn new(channel: C) -> Self {
        Self::with_config(channel, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(channel: C, config: ClientConfig) -> Self {
        Self { channel, config }
    }

    /// Borrow the underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Consume the client and return the channel.
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Initialize CRAM scan. Acknowledged as `0x10301`.
    pub fn cram_init(&mut self) -> Result<IpiResponse> {
        self.ack_request(Command::CramInit, &[])
    }

    /// Start CRAM scan. Acknowledged as `0x10302`.
    pub fn cram_start_scan(&mut self) -> Result<IpiResponse> {
        self.ack_request(Command::CramStartScan, &[])
    }

    /// Stop CRAM scan. Acknowledged as `0x10303`.
    pub fn cram_stop_scan(&mut self) -> Result<IpiResponse> {
        self.ack_request(Command::CramStopScan, &[])
    }

    /// Inject a single-bit error into CRAM.
    ///
    /// An out-of-range location is reported by the server through the
    /// status, see [`IpiResponse::cram_error`].
    pub fn cram_inject_error(&mut self, injection: &ErrorInjection) -> Result<IpiResponse> {
        self.ack_request(Command::CramInjectError, &injection.to_args())
    }

    /// Read the ECC of both segments of one frame.
    pub fn cram_read_frame_ecc(&mut self, frame: FrameAddress, row: u32) -> Result<FrameEcc> {
        let fields = self.round_trip(Command::CramReadFrameEcc, &[frame.to_word(), row])?;
        Ok(FrameEcc::from(IpiResponse::full(&fields)))
    }

    /// Start NPI scan. Acknowledged as `0x10305`.
    pub fn npi_start_scan(&mut self) -> Result<IpiResponse> {
        self.ack_request(Command::NpiStartScan, &[])
    }

    /// Stop NPI scan. Acknowledged as `0x10306`.
    pub fn npi_stop_scan(&mut self) -> Result<IpiResponse> {
        self.ack_request(Command::NpiStopScan, &[])
    }

    /// Corrupt the SHA of the first NPI descriptor.
    ///
    /// Calling it a second time restores the descriptor.
    pub fn npi_inject_error(&mut self) -> Result<IpiResponse> {
        self.ack_request(Command::NpiInjectError, &[])
    }

    /// Ask the server to copy the golden SHA and descriptor information into
    /// the buffer at physical address `buffer_addr`.
    pub fn npi_golden_sha(&mut self, buffer_addr: u32) -> Result<IpiResponse> {
        if buffer_addr == 0 {
            debug!(command = %Command::NpiGoldenSha, "rejecting null descriptor buffer");
            return Err(ClientError::InvalidArgument(
                "descriptor buffer address is null",
            ));
        }
        self.ack_request(Command::NpiGoldenSha, &[buffer_addr])
    }

    /// Read CRAM and NPI attribute registers.
    pub fn get_config(&mut self) -> Result<SemConfig> {
        let fields = self.round_trip(Command::GetConfig, &[])?;
        Ok(SemConfig::from(IpiResponse::full(&fields)))
    }

    /// Register or unregister event notification, depending on
    /// `notifier.flag`.
    pub fn register_event(&mut self, notifier: &Notifier) -> Result<IpiResponse> {
        self.ack_request(Command::EventRegister, &notifier.to_args())
    }

    fn ack_request(&mut self, command: Command, args: &[u32]) -> Result<IpiResponse> {
        let fields = self.round_trip(command, args)?;
        Ok(IpiResponse::ack(&fields))
    }

    fn round_trip(&mut self, command: Command, args: &[u32]) -> Result<ReplyFields> {
        let request = pack(command, args)?;
        debug!(
            %command,
            header = format_args!("{:#x}", request.header()),
            args = ?request.args(),
            "sending request"
        );

        if let Err(err) = self.channel.send(request.as_words()) {
            debug!(%command, error = %err, "request not delivered");
            return Err(err.into());
        }
        let words = match self.channel.receive() {
            Ok(words) => words,
            Err(err) => {
                debug!(%command, error = %err, "no reply");
                return Err(err.into());
            }
        };

        let fields = validate(&Response::from_words(words)).inspect_err(|err| {
            debug!(%command, error = %err, "reply rejected");
        })?;

        if self.config.check_ack && !fields.acknowledges(command) {
            warn!(
                %command,
                ack_id = format_args!("{:#x}", fields.ack_id),
                "acknowledgment id does not match request"
            );
        }
        debug!(
            %command,
            ack_id = format_args!("{:#x}", fields.ack_id),
            status = format_args!("{:#x}", fields.data[0]),
            "reply received"
        );

        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use xsem_codec::{CodecError, CramErrorCode};
    use xsem_transport::{IpiMessage, TransportError};

    use super::*;
    use crate::notifier::{EventMask, NotifyFlag, NotifyModule};

    /// Records every request and plays back scripted replies.
    #[derive(Default)]
    struct RecordingChannel {
        sent: Vec<IpiMessage>,
        replies: VecDeque<std::result::Result<IpiMessage, TransportError>>,
        fail_send: bool,
        receive_calls: usize,
    }

    impl RecordingChannel {
        fn replying(replies: Vec<IpiMessage>) -> Self {
            Self {
                replies: replies.into_iter().map(Ok).collect(),
                ..Self::default()
            }
        }
    }

    impl IpiChannel for RecordingChannel {
        fn send(&mut self, message: &IpiMessage) -> xsem_transport::Result<()> {
            if self.fail_send {
                return Err(TransportError::Shutdown);
            }
            self.sent.push(*message);
            Ok(())
        }

        fn receive(&mut self) -> xsem_transport::Result<IpiMessage> {
            self.receive_calls += 1;
            self.replies.pop_front().unwrap_or(Err(TransportError::Closed))
        }
    }

    fn reply(ack: u32, data: [u32; 3]) -> IpiMessage {
        [0, ack, data[0], data[1], data[2], 0xDEAD, 0xBEEF, 0xF00D]
    }

    #[test]
    fn start_scan_copies_ack_and_status() {
        let channel = RecordingChannel::replying(vec![reply(0x10302, [0, 0, 0])]);
        let mut client = SemClient::new(channel);

        let resp = client.cram_start_scan().expect("start scan should succeed");

        assert_eq!(resp.resp_msg1, 0x10302);
        assert_eq!(resp.resp_msg2, 0);
        assert!(resp.is_accepted());
        assert_eq!(resp.command(), Some(Command::CramStartScan));
        assert_eq!(client.channel().sent, vec![[0x10302, 0, 0, 0, 0, 0, 0, 0]]);
    }

    #[test]
    fn inject_error_reports_masked_bit_as_status() {
        let channel = RecordingChannel::replying(vec![reply(0x10304, [0b01101, 0, 0])]);
        let mut client = SemClient::new(channel);
        let injection = ErrorInjection {
            row: 5,
            frame: FrameAddress::new(0x00100, 0),
            qword: 12,
            bit: 64,
        };

        let resp = client
            .cram_inject_error(&injection)
            .expect("transport succeeded, so the call succeeds");

        assert!(!resp.is_accepted());
        assert_eq!(resp.cram_error(), Some(CramErrorCode::MaskedBit));
        let sent = client.channel().sent[0];
        assert_eq!(sent[0], 0x50304);
        assert_eq!(&sent[1..5], &[0x100, 12, 64, 5]);
    }

    #[test]
    fn ack_commands_copy_only_ack_and_status() {
        type Op = fn(&mut SemClient<RecordingChannel>) -> Result<IpiResponse>;
        let ops: [(Command, Op); 7] = [
            (Command::CramInit, |c| c.cram_init()),
            (Command::CramStartScan, |c| c.cram_start_scan()),
            (Command::CramStopScan, |c| c.cram_stop_scan()),
            (Command::NpiStartScan, |c| c.npi_start_scan()),
            (Command::NpiStopScan, |c| c.npi_stop_scan()),
            (Command::NpiInjectError, |c| c.npi_inject_error()),
            (Command::NpiGoldenSha, |c| c.npi_golden_sha(0x1000_0000)),
        ];

        for (command, op) in ops {
            let ack = command.header(1);
            let channel = RecordingChannel::replying(vec![reply(ack, [7, 0x33, 0x44])]);
            let mut client = SemClient::new(channel);

            let resp = op(&mut client).expect("round trip should succeed");

            assert_eq!(
                resp,
                IpiResponse {
                    resp_msg1: ack,
                    resp_msg2: 7,
                    resp_msg3: 0,
                    resp_msg4: 0,
                },
                "{command}"
            );
            assert_eq!(client.channel().sent[0][0] & 0xFF, command.api_id());
        }
    }

    #[test]
    fn transport_send_failure_skips_receive() {
        let mut channel = RecordingChannel::replying(vec![reply(0x10301, [0, 0, 0])]);
        channel.fail_send = true;
        let mut client = SemClient::new(channel);

        let err = client.cram_init().unwrap_err();

        assert!(matches!(
            err,
            ClientError::Transport(TransportError::Shutdown)
        ));
        assert_eq!(client.channel().receive_calls, 0);
    }

    #[test]
    fn missing_reply_is_transport_failure() {
        let mut client = SemClient::new(RecordingChannel::default());
        let err = client.get_config().unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::Closed)));
    }

    #[test]
    fn failed_completion_code_is_returned() {
        let mut words = reply(0x10305, [0, 0, 0]);
        words[0] = 0x15;
        let mut client = SemClient::new(RecordingChannel::replying(vec![words]));

        let err = client.npi_start_scan().unwrap_err();

        assert!(matches!(
            err,
            ClientError::Codec(CodecError::Completion { code: 0x15 })
        ));
    }

    #[test]
    fn golden_sha_rejects_null_buffer_without_transport() {
        let mut client = SemClient::new(RecordingChannel::replying(vec![reply(
            0x10310,
            [0, 0, 0],
        )]));

        let err = client.npi_golden_sha(0).unwrap_err();

        assert!(matches!(err, ClientError::InvalidArgument(_)));
        assert!(client.channel().sent.is_empty());
        assert_eq!(client.channel().receive_calls, 0);
    }

    #[test]
    fn golden_sha_forwards_buffer_address() {
        let mut client = SemClient::new(RecordingChannel::replying(vec![reply(
            0x10310,
            [0, 0, 0],
        )]));

        client.npi_golden_sha(0x0400_0000).unwrap();

        assert_eq!(client.channel().sent[0][..2], [0x20310, 0x0400_0000]);
    }

    #[test]
    fn read_frame_ecc_copies_all_four_words() {
        let channel = RecordingChannel::replying(vec![reply(0x3030A, [0x1111, 0x2222, 0])]);
        let mut client = SemClient::new(channel);

        let ecc = client
            .cram_read_frame_ecc(FrameAddress::new(0x20, 2), 3)
            .unwrap();

        assert_eq!(
            ecc,
            FrameEcc {
                ack_id: 0x3030A,
                segment0: 0x1111,
                segment1: 0x2222,
                status: 0,
            }
        );
        assert!(ecc.is_accepted());
        assert_eq!(client.channel().sent[0][..4], [0x3030A, 0x0020_0020, 3, 0]);
    }

    #[test]
    fn get_config_relays_attribute_words() {
        let cram = 0b010_0110;
        let npi = (0x064 << 8) | (1 << 2);
        let channel = RecordingChannel::replying(vec![reply(0x30309, [cram, npi, 0])]);
        let mut client = SemClient::new(channel);

        let config = client.get_config().unwrap();

        assert_eq!(config.ack_id, 0x30309);
        assert_eq!(config.cram.raw(), cram);
        assert_eq!(config.npi.raw(), npi);
        assert_eq!(config.npi.scan_interval_ms(), 100);
        assert_eq!(config.response().resp_msg4, 0);
        assert_eq!(client.channel().sent[0][0], 0x10309);
    }

    #[test]
    fn register_then_unregister_sends_independent_requests() {
        let channel = RecordingChannel::replying(vec![
            reply(0x40308, [0, 0, 0]),
            reply(0x40308, [0, 0, 0]),
        ]);
        let mut client = SemClient::new(channel);
        let events = EventMask::CRAM_CRC | EventMask::CRAM_UNCORRECTABLE_ECC;

        let on = Notifier::enable(NotifyModule::Cram, events);
        let off = Notifier {
            flag: NotifyFlag::Disable,
            ..on
        };
        client.register_event(&on).unwrap();
        client.register_event(&off).unwrap();

        let sent = &client.channel().sent;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0][..4], [0x40308, 0x1, 0x3, 0x1]);
        assert_eq!(sent[1][..4], [0x40308, 0x1, 0x3, 0x0]);
    }

    #[test]
    fn mismatched_ack_is_still_returned() {
        let channel = RecordingChannel::replying(vec![reply(0x10303, [0, 0, 0])]);
        let mut client = SemClient::new(channel);

        let resp = client.cram_start_scan().unwrap();

        assert_eq!(resp.ack_id(), 0x10303);
        assert_eq!(resp.command(), Some(Command::CramStopScan));
    }
}
