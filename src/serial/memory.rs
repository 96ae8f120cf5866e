//! In-memory serial ports backed by [`tokio::io::duplex`].
//!
//! Each [`MemoryPort`] is paired with a [`DeviceEnd`] that plays the device:
//! bytes written to the device end are read by the session and vice versa.
//! Used by the demo device and by every session test.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{
    AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf,
};

use super::port::{OpenPort, PortHandle, PortProvider};
use super::SerialError;

/// Default in-flight byte capacity of each direction of a memory port.
pub const DEFAULT_PIPE_CAPACITY: usize = 4096;

/// Host side of an in-memory port.
#[derive(Debug)]
pub struct MemoryPort {
    name: String,
    stream: DuplexStream,
    opened_at: Arc<Mutex<Option<u32>>>,
    fail_open: bool,
}

/// Device side of an in-memory port.
#[derive(Debug)]
pub struct DeviceEnd {
    reader: BufReader<ReadHalf<DuplexStream>>,
    writer: WriteHalf<DuplexStream>,
    opened_at: Arc<Mutex<Option<u32>>>,
    partial: Vec<u8>,
}

impl MemoryPort {
    /// Creates a connected port/device pair.
    pub fn pair(name: impl Into<String>) -> (Self, DeviceEnd) {
        Self::pair_with_capacity(name, DEFAULT_PIPE_CAPACITY)
    }

    /// Creates a pair whose pipes hold at most `capacity` unread bytes.
    pub fn pair_with_capacity(name: impl Into<String>, capacity: usize) -> (Self, DeviceEnd) {
        let (host, device) = tokio::io::duplex(capacity);
        let opened_at = Arc::new(Mutex::new(None));
        let (reader, writer) = tokio::io::split(device);
        (
            Self {
                name: name.into(),
                stream: host,
                opened_at: Arc::clone(&opened_at),
                fail_open: false,
            },
            DeviceEnd {
                reader: BufReader::new(reader),
                writer,
                opened_at,
                partial: Vec::new(),
            },
        )
    }

    /// Makes `open` fail with a transport error, as a yanked cable would.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }
}

#[async_trait]
impl PortHandle for MemoryPort {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(self: Box<Self>, baud_rate: u32) -> Result<OpenPort, SerialError> {
        let this = *self;
        if this.fail_open {
            return Err(SerialError::Transport(format!(
                "failed to open {}",
                this.name
            )));
        }
        *this.opened_at.lock() = Some(baud_rate);
        let (reader, writer) = tokio::io::split(this.stream);
        Ok(OpenPort {
            name: this.name,
            reader: Box::new(reader),
            writer: Box::new(writer),
        })
    }
}

impl DeviceEnd {
    /// Baud rate the host opened the port at, if it has been opened.
    pub fn baud_rate(&self) -> Option<u32> {
        *self.opened_at.lock()
    }

    /// Writes raw bytes towards the host.
    ///
    /// # Errors
    /// Fails once the host side has been dropped.
    pub async fn write_raw(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await
    }

    /// Writes `line` plus a newline towards the host.
    ///
    /// # Errors
    /// Fails once the host side has been dropped.
    pub async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.write_raw(&super::codec::encode_line(line)).await
    }

    /// Reads the next line written by the host, without its terminator.
    ///
    /// Returns `Ok(None)` once the host has closed the port. Safe to use in
    /// `select!`: a partially read line is kept for the next call.
    ///
    /// # Errors
    /// Propagates read errors from the pipe.
    pub async fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let n = self.reader.read_until(b'\n', &mut self.partial).await?;
        if n == 0 && self.partial.is_empty() {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&self.partial)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        self.partial.clear();
        Ok(Some(line))
    }
}

enum Grant {
    Port(MemoryPort),
    Deny,
}

/// Provider that hands out queued in-memory ports in order.
///
/// An empty queue behaves like a host with no serial ports
/// ([`SerialError::UnsupportedPlatform`]).
#[derive(Default)]
pub struct MemoryPortProvider {
    grants: Mutex<VecDeque<Grant>>,
}

impl std::fmt::Debug for MemoryPortProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryPortProvider")
            .field("queued", &self.grants.lock().len())
            .finish()
    }
}

impl MemoryPortProvider {
    /// Creates a provider with nothing to offer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `port` to be granted on the next request.
    pub fn offer(&self, port: MemoryPort) {
        self.grants.lock().push_back(Grant::Port(port));
    }

    /// Queues a refusal, as if the user dismissed the port chooser.
    pub fn deny_next(&self) {
        self.grants.lock().push_back(Grant::Deny);
    }

    /// Number of queued grants and refusals.
    pub fn queued(&self) -> usize {
        self.grants.lock().len()
    }
}

#[async_trait]
impl PortProvider for MemoryPortProvider {
    async fn request_port(&self) -> Result<Box<dyn PortHandle>, SerialError> {
        let grant = self.grants.lock().pop_front();
        match grant {
            Some(Grant::Port(port)) => Ok(Box::new(port)),
            Some(Grant::Deny) => Err(SerialError::PermissionDenied),
            None => Err(SerialError::UnsupportedPlatform),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_empty_provider_is_unsupported() {
        let provider = MemoryPortProvider::new();
        assert!(matches!(
            provider.request_port().await,
            Err(SerialError::UnsupportedPlatform)
        ));
    }

    #[tokio::test]
    async fn test_deny_then_offer_in_order() {
        let provider = MemoryPortProvider::new();
        let (port, _device) = MemoryPort::pair("mem0");
        provider.deny_next();
        provider.offer(port);
        assert_eq!(provider.queued(), 2);

        assert!(matches!(
            provider.request_port().await,
            Err(SerialError::PermissionDenied)
        ));
        let handle = provider.request_port().await;
        assert_eq!(handle.map(|h| h.name().to_string()).ok(), Some("mem0".into()));
    }

    #[tokio::test]
    async fn test_open_records_baud_and_moves_bytes() {
        let (port, mut device) = MemoryPort::pair("mem0");
        assert_eq!(device.baud_rate(), None);

        let mut open = Box::new(port).open(115_200).await.expect("test: open");
        assert_eq!(device.baud_rate(), Some(115_200));

        open.writer.write_all(b"hello\n").await.expect("test: write");
        open.writer.flush().await.expect("test: flush");
        assert_eq!(device.read_line().await.expect("test: read"), Some("hello".into()));

        device.write_raw(b"abc").await.expect("test: device write");
        let mut buf = [0u8; 3];
        open.reader.read_exact(&mut buf).await.expect("test: read back");
        assert_eq!(&buf, b"abc");
    }

    #[tokio::test]
    async fn test_failing_open_is_transport_error() {
        let (port, _device) = MemoryPort::pair("mem0");
        let result = Box::new(port.failing_open()).open(9600).await;
        assert!(matches!(result, Err(SerialError::Transport(_))));
    }

    #[tokio::test]
    async fn test_device_read_line_none_after_host_drop() {
        let (port, mut device) = MemoryPort::pair("mem0");
        let open = Box::new(port).open(115_200).await.expect("test: open");
        drop(open);
        assert_eq!(device.read_line().await.expect("test: read"), None);
    }
}
