use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::time::Duration;

use bytes::BytesMut;
use tracing::trace;
use xsem_transport::{IpiChannel, IpiMessage, Result, TransportError};

use crate::codec::{decode_message, encode_message, MESSAGE_SIZE};

/// Configuration for byte-stream mailboxes.
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// Read timeout while waiting for a reply. `None` blocks forever.
    pub read_timeout: Option<Duration>,
    /// Write timeout while delivering a request.
    pub write_timeout: Option<Duration>,
}

/// IPI channel over any byte stream.
///
/// Each message is [`MESSAGE_SIZE`] bytes of little-endian words. Useful for
/// mailbox character devices and for proxies that forward requests to the
/// platform loader. Handles partial reads and writes internally.
pub struct StreamChannel<T> {
    inner: T,
    buf: BytesMut,
    config: StreamConfig,
}

impl<T: Read + Write> StreamChannel<T> {
    /// Create a channel with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, StreamConfig::default())
    }

    /// Create a channel with explicit configuration.
    ///
    /// Timeouts in `config` are only reported here; applying them is up to
    /// the stream (see [`StreamChannel::connect`]).
    pub fn with_config(inner: T, config: StreamConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(2 * MESSAGE_SIZE),
            config,
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the channel and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current channel configuration.
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.map_io(err, self.config.write_timeout)),
            }
        }
    }

    fn map_io(&self, err: std::io::Error, timeout: Option<Duration>) -> TransportError {
        match err.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => {
                TransportError::Timeout(timeout.unwrap_or_default())
            }
            _ => TransportError::Io(err),
        }
    }
}

impl<T: Read + Write> IpiChannel for StreamChannel<T> {
    fn send(&mut self, message: &IpiMessage) -> Result<()> {
        let mut out = BytesMut::with_capacity(MESSAGE_SIZE);
        encode_message(message, &mut out);

        let mut offset = 0usize;
        while offset < out.len() {
            match self.inner.write(&out[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.map_io(err, self.config.write_timeout)),
            }
        }
        trace!(header = format_args!("{:#x}", message[0]), "request written");

        self.flush()
    }

    fn receive(&mut self) -> Result<IpiMessage> {
        loop {
            if let Some(message) = decode_message(&mut self.buf) {
                trace!(completion = message[0], "reply read");
                return Ok(message);
            }

            let mut chunk = [0u8; MESSAGE_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.map_io(err, self.config.read_timeout)),
            };

            if read == 0 {
                return Err(TransportError::Closed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }
}

impl StreamChannel<File> {
    /// Open a mailbox character device for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| TransportError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(file))
    }
}

#[cfg(unix)]
impl StreamChannel<std::os::unix::net::UnixStream> {
    /// Connect to a mailbox proxy listening on a Unix domain socket and apply
    /// the configured timeouts.
    pub fn connect(path: impl AsRef<Path>, config: StreamConfig) -> Result<Self> {
        let path = path.as_ref();
        let stream = std::os::unix::net::UnixStream::connect(path).map_err(|source| {
            TransportError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;
        Ok(Self::with_config(stream, config))
    }
}
