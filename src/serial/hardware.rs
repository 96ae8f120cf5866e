//! OS serial ports through `tokio-serial`.
//!
//! Enabled with the `hardware` feature. With no explicit port name the first
//! enumerated USB port is granted, falling back to the first port of any kind.

use async_trait::async_trait;
use tokio_serial::{SerialPortBuilderExt, SerialPortType};
use tracing::{debug, info};

use super::port::{OpenPort, PortHandle, PortProvider};
use super::SerialError;

/// Grants ports from the operating system.
#[derive(Debug, Clone, Default)]
pub struct SystemPortProvider {
    preferred: Option<String>,
}

impl SystemPortProvider {
    /// Creates a provider; `preferred` pins the port name instead of probing.
    pub fn new(preferred: Option<String>) -> Self {
        Self { preferred }
    }
}

#[async_trait]
impl PortProvider for SystemPortProvider {
    async fn request_port(&self) -> Result<Box<dyn PortHandle>, SerialError> {
        if let Some(name) = &self.preferred {
            return Ok(Box::new(SystemPort { name: name.clone() }));
        }

        let ports = tokio_serial::available_ports().map_err(map_serial_error)?;
        debug!(count = ports.len(), "enumerated serial ports");

        let chosen = ports
            .iter()
            .find(|p| matches!(p.port_type, SerialPortType::UsbPort(_)))
            .or_else(|| ports.first())
            .ok_or(SerialError::UnsupportedPlatform)?;

        info!(port = %chosen.port_name, "serial port granted");
        Ok(Box::new(SystemPort {
            name: chosen.port_name.clone(),
        }))
    }
}

/// A named OS port.
#[derive(Debug)]
struct SystemPort {
    name: String,
}

#[async_trait]
impl PortHandle for SystemPort {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(self: Box<Self>, baud_rate: u32) -> Result<OpenPort, SerialError> {
        let this = *self;
        let stream = tokio_serial::new(&this.name, baud_rate)
            .open_native_async()
            .map_err(map_serial_error)?;
        let (reader, writer) = tokio::io::split(stream);
        Ok(OpenPort {
            name: this.name,
            reader: Box::new(reader),
            writer: Box::new(writer),
        })
    }
}

fn map_serial_error(err: tokio_serial::Error) -> SerialError {
    match err.kind {
        tokio_serial::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
            SerialError::PermissionDenied
        }
        tokio_serial::ErrorKind::NoDevice => SerialError::UnsupportedPlatform,
        _ => SerialError::Transport(err.description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_error_maps_to_permission_denied() {
        let err = tokio_serial::Error::new(
            tokio_serial::ErrorKind::Io(std::io::ErrorKind::PermissionDenied),
            "denied",
        );
        assert_eq!(map_serial_error(err), SerialError::PermissionDenied);
    }

    #[test]
    fn test_other_error_maps_to_transport() {
        let err = tokio_serial::Error::new(tokio_serial::ErrorKind::Unknown, "weird");
        assert_eq!(map_serial_error(err), SerialError::Transport("weird".into()));
    }

    #[tokio::test]
    async fn test_preferred_port_is_granted_without_probing() {
        let provider = SystemPortProvider::new(Some("/dev/ttyACM7".into()));
        let handle = provider.request_port().await.expect("test: request");
        assert_eq!(handle.name(), "/dev/ttyACM7");
    }
}
