//! # Module: Demo Device
//!
//! ## Responsibility
//! A pretend Pico 2W living on the far end of an in-memory port, so the
//! dashboard can be driven without hardware (`--demo`). It answers a handful
//! of text commands and emits a periodic heartbeat line.
//!
//! ## Guarantees
//! - Exits when the host closes the port or the shutdown signal fires
//! - Every reply is exactly one line

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::memory::{DeviceEnd, MemoryPort};
use super::port::{PortHandle, PortProvider};
use super::SerialError;

/// Port name reported by [`DemoPortProvider`].
pub const DEMO_PORT_NAME: &str = "demo:pico2w";

/// Firmware banner reported by `version`.
pub const FIRMWARE_BANNER: &str = "pico2w-proxy 0.3.1 (CircuitPython 9.2)";

/// Builds the one-line reply to `command`.
///
/// Known commands match case-insensitively; anything else is echoed back
/// as typed, minus surrounding whitespace.
pub fn reply_to(command: &str) -> String {
    let command = command.trim();
    let is = |name: &str| command.eq_ignore_ascii_case(name);
    if is("ping") {
        "pong".to_string()
    } else if is("status") {
        "cpu=23% mem=45MB/264MB wifi=-67dBm temp=42C power=usb5v".to_string()
    } else if is("version") {
        FIRMWARE_BANNER.to_string()
    } else if is("help") {
        "commands: ping status version help".to_string()
    } else {
        format!("ok: {command}")
    }
}

/// Spawns the demo device on `device`.
///
/// # Arguments
/// * `device` - Device end of a [`super::MemoryPort`] pair.
/// * `heartbeat` - Interval between `heartbeat <n>` lines.
/// * `shutdown_rx` - Stops the device when set to `true`.
pub fn spawn_demo_device(
    mut device: DeviceEnd,
    heartbeat: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(heartbeat);
        // First tick of a tokio interval fires immediately.
        ticker.tick().await;
        let mut beats: u64 = 0;

        if device.write_line(FIRMWARE_BANNER).await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    beats += 1;
                    if device.write_line(&format!("heartbeat {beats}")).await.is_err() {
                        break;
                    }
                }
                line = device.read_line() => match line {
                    Ok(Some(command)) => {
                        debug!(command = %command, "demo device received command");
                        if device.write_line(&reply_to(&command)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) | Err(_) => break,
                },
            }
        }
        debug!("demo device stopped");
    })
}

/// Grants a fresh in-memory port with a demo device behind it on every request.
#[derive(Debug, Clone)]
pub struct DemoPortProvider {
    heartbeat: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl DemoPortProvider {
    /// Creates a provider whose devices beat every `heartbeat` and stop when
    /// `shutdown_rx` flips to `true`.
    pub fn new(heartbeat: Duration, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self {
            heartbeat,
            shutdown_rx,
        }
    }
}

#[async_trait]
impl PortProvider for DemoPortProvider {
    async fn request_port(&self) -> Result<Box<dyn PortHandle>, SerialError> {
        if *self.shutdown_rx.borrow() {
            return Err(SerialError::UnsupportedPlatform);
        }
        let (port, device) = MemoryPort::pair(DEMO_PORT_NAME);
        spawn_demo_device(device, self.heartbeat, self.shutdown_rx.clone());
        info!(port = DEMO_PORT_NAME, "demo device started");
        Ok(Box::new(port))
    }
}
