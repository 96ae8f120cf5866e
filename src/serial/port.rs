//! Port abstraction: the seam between the session and whatever supplies bytes.
//!
//! A [`PortProvider`] plays the part of the host's "choose a port" prompt; the
//! [`PortHandle`] it returns is opened at a baud rate and split into an
//! independent read half and write half.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use super::SerialError;

/// Read half of an open port.
pub type PortReader = Box<dyn AsyncRead + Send + Unpin>;

/// Write half of an open port.
pub type PortWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// An opened port split into halves. Dropping both halves closes the port.
pub struct OpenPort {
    /// Display name of the port (e.g. `/dev/ttyACM0`).
    pub name: String,
    /// Incoming byte stream.
    pub reader: PortReader,
    /// Outgoing byte sink.
    pub writer: PortWriter,
}

impl std::fmt::Debug for OpenPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenPort").field("name", &self.name).finish()
    }
}

/// Grants access to a serial port.
#[async_trait]
pub trait PortProvider: Send + Sync {
    /// Asks for a port.
    ///
    /// # Errors
    /// - [`SerialError::PermissionDenied`] if access was refused.
    /// - [`SerialError::UnsupportedPlatform`] if there is no serial capability
    ///   or no port to offer.
    async fn request_port(&self) -> Result<Box<dyn PortHandle>, SerialError>;
}

/// A port that has been granted but not opened yet.
#[async_trait]
pub trait PortHandle: Send {
    /// Display name of the port.
    fn name(&self) -> &str;

    /// Opens the port at `baud_rate`.
    ///
    /// # Errors
    /// Returns [`SerialError::Transport`] if the device cannot be opened.
    async fn open(self: Box<Self>, baud_rate: u32) -> Result<OpenPort, SerialError>;
}

/// Provider for hosts without serial support.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedProvider;

#[async_trait]
impl PortProvider for UnsupportedProvider {
    async fn request_port(&self) -> Result<Box<dyn PortHandle>, SerialError> {
        Err(SerialError::UnsupportedPlatform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_provider_always_fails() {
        let provider = UnsupportedProvider;
        let result = provider.request_port().await;
        assert!(matches!(result, Err(SerialError::UnsupportedPlatform)));
    }
}
