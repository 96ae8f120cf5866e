//! # Module: Serial Transport
//!
//! ## Responsibility
//! Line-oriented serial session to the Pico: request a port, open it, decode
//! incoming bytes into text lines, and write text commands. This is the only
//! part of the dashboard that talks to something outside the process.
//!
//! ## Guarantees
//! - At most one open port and one read loop per [`SerialSession`]
//! - The read loop is cancelled and joined before the port is closed
//! - Only the session appends to its [`MessageLog`]
//!
//! ## NOT Responsible For
//! - UART framing, flow control or any protocol above plain text lines
//! - Reconnecting after failures (always user initiated)

pub mod codec;
pub mod device;
pub mod memory;
pub mod message;
pub mod port;
pub mod session;

#[cfg(feature = "hardware")]
pub mod hardware;

pub use codec::{encode_line, LineDecoder};
pub use device::{spawn_demo_device, DemoPortProvider, DEMO_PORT_NAME};
pub use memory::{DeviceEnd, MemoryPort, MemoryPortProvider};
pub use message::{Direction, Message, MessageLog};
pub use port::{OpenPort, PortHandle, PortProvider, PortReader, PortWriter, UnsupportedProvider};
pub use session::{
    ConnectionState, DisconnectReason, SerialSession, SessionConfig, SessionEvent,
    DEFAULT_BAUD_RATE,
};

#[cfg(feature = "hardware")]
pub use hardware::SystemPortProvider;

use thiserror::Error;

/// Errors surfaced by the serial session.
///
/// Cloneable so a failure can travel inside a [`SessionEvent`] to every
/// subscriber.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerialError {
    /// The user or the platform refused access to the port.
    #[error("permission to access the serial port was denied")]
    PermissionDenied,

    /// No serial capability (or no port at all) on this host.
    #[error("serial ports are not supported on this platform")]
    UnsupportedPlatform,

    /// Reading from or writing to the port failed.
    #[error("serial transport error: {0}")]
    Transport(String),

    /// An operation that needs an open port was attempted without one.
    #[error("no serial port is connected")]
    NotConnected,

    /// `connect` was called while a port is already open.
    #[error("a serial port is already connected")]
    AlreadyConnected,

    /// The text to send spans more than one line.
    #[error("message must be a single line")]
    MultiLine,
}

impl From<std::io::Error> for SerialError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_permission_denied_maps_to_permission_denied() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(SerialError::from(err), SerialError::PermissionDenied);
    }

    #[test]
    fn test_io_broken_pipe_maps_to_transport() {
        let err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "unplugged");
        assert!(matches!(SerialError::from(err), SerialError::Transport(msg) if msg.contains("unplugged")));
    }

    #[test]
    fn test_error_messages_are_user_readable() {
        assert_eq!(
            SerialError::UnsupportedPlatform.to_string(),
            "serial ports are not supported on this platform"
        );
        assert_eq!(
            SerialError::Transport("device gone".into()).to_string(),
            "serial transport error: device gone"
        );
    }
}
