//! # Module: Serial Session
//!
//! ## Responsibility
//! Owns the single open port, runs the background read loop, and keeps the
//! ordered message log. Every state change and log append is published to
//! subscribers as a [`SessionEvent`].
//!
//! ## Guarantees
//! - `state()` is `Connected` exactly while a port and its read loop exist
//! - `disconnect()` joins the read loop before closing the write half
//! - `disconnect()` with nothing open is a no-op
//! - A failed `send()` leaves the session connected; a failed read does not
//!
//! ## NOT Responsible For
//! - Choosing a port (that belongs to the [`PortProvider`])
//! - Showing notifications (subscribers decide what to display)

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::codec::{encode_line, LineDecoder};
use super::message::{Direction, Message, MessageLog};
use super::port::{OpenPort, PortProvider, PortReader, PortWriter};
use super::SerialError;

/// Baud rate the Pico firmware listens at.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Tunables for a [`SerialSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Baud rate passed to `open`.
    pub baud_rate: u32,
    /// Longest line (in bytes) before it is force-flushed.
    pub max_line_length: usize,
    /// Size of each read from the port.
    pub read_chunk_size: usize,
    /// Capacity of the read-loop channel and of the subscriber broadcast.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            max_line_length: 4096,
            read_chunk_size: 256,
            event_capacity: 256,
        }
    }
}

/// Whether a port is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No port open.
    Disconnected,
    /// A port is open and the read loop is running.
    Connected,
}

impl ConnectionState {
    /// Badge text for the title bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connected => "Connected",
        }
    }
}

/// Why a session left the `Connected` state.
#[derive(Debug, Clone, PartialEq)]
pub enum DisconnectReason {
    /// `disconnect()` was called.
    Requested,
    /// The device closed the stream.
    EndOfStream,
    /// Reading from the port failed.
    Failed(SerialError),
}

/// Observable change to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A port was opened and the read loop started.
    Connected {
        /// Name of the opened port.
        port: String,
    },
    /// The port was closed.
    Disconnected {
        /// What closed it.
        reason: DisconnectReason,
    },
    /// A message was appended to the log.
    MessageAppended(Message),
}

/// What the read loop reports back to the session.
#[derive(Debug)]
enum ReadEvent {
    Line(String),
    Ended,
    Failed(SerialError),
}

/// Resources held while connected.
struct Link {
    port: String,
    writer: PortWriter,
    shutdown_tx: watch::Sender<bool>,
    reader_task: JoinHandle<()>,
    inbound: mpsc::Receiver<ReadEvent>,
}

/// Line-oriented session over one serial port.
pub struct SerialSession {
    provider: Arc<dyn PortProvider>,
    config: SessionConfig,
    log: MessageLog,
    link: Option<Link>,
    updates: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SerialSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialSession")
            .field("state", &self.state())
            .field("port", &self.port_name())
            .field("messages", &self.log.len())
            .finish()
    }
}

impl SerialSession {
    /// Creates a disconnected session that will ask `provider` for ports.
    pub fn new(provider: Arc<dyn PortProvider>, config: SessionConfig) -> Self {
        let (updates, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            provider,
            config,
            log: MessageLog::new(),
            link: None,
            updates,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        if self.link.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Shorthand for `state() == Connected`.
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Name of the open port, if any.
    pub fn port_name(&self) -> Option<&str> {
        self.link.as_ref().map(|l| l.port.as_str())
    }

    /// The message log.
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Session tunables.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Subscribes to every future [`SessionEvent`].
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.updates.subscribe()
    }

    /// Requests a port, opens it at the configured baud rate and starts the
    /// read loop.
    ///
    /// # Errors
    /// - [`SerialError::AlreadyConnected`] if a port is already open.
    /// - [`SerialError::PermissionDenied`] / [`SerialError::UnsupportedPlatform`]
    ///   from the provider.
    /// - [`SerialError::Transport`] if the port cannot be opened.
    ///
    /// On any error the session stays `Disconnected`.
    pub async fn connect(&mut self) -> Result<(), SerialError> {
        if self.link.is_some() {
            return Err(SerialError::AlreadyConnected);
        }

        let handle = self.provider.request_port().await.map_err(|e| {
            warn!(error = %e, "serial port request failed");
            e
        })?;
        let requested = handle.name().to_string();

        let OpenPort {
            name,
            reader,
            writer,
        } = handle.open(self.config.baud_rate).await.map_err(|e| {
            warn!(port = %requested, error = %e, "failed to open serial port");
            e
        })?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (tx, inbound) = mpsc::channel(self.config.event_capacity.max(1));
        let decoder = LineDecoder::new(self.config.max_line_length);
        let reader_task = tokio::spawn(read_loop(
            reader,
            decoder,
            self.config.read_chunk_size.max(1),
            shutdown_rx,
            tx,
        ));

        info!(port = %name, baud_rate = self.config.baud_rate, "serial port opened");

        self.link = Some(Link {
            port: name.clone(),
            writer,
            shutdown_tx,
            reader_task,
            inbound,
        });
        self.publish(SessionEvent::Connected { port: name });
        Ok(())
    }

    /// Writes `text` plus a newline to the device and logs it as sent.
    ///
    /// Whitespace-only input is ignored. Surrounding whitespace, including a
    /// trailing line terminator, is sent as given.
    ///
    /// # Errors
    /// - [`SerialError::MultiLine`] if `text` has a `\r` or `\n` before its
    ///   last non-whitespace character; nothing is written.
    /// - [`SerialError::NotConnected`] without an open port.
    /// - [`SerialError::Transport`] if the write fails; the session stays
    ///   connected and nothing is logged.
    pub async fn send(&mut self, text: &str) -> Result<(), SerialError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        if text.trim().contains(['\r', '\n']) {
            return Err(SerialError::MultiLine);
        }
        let link = self.link.as_mut().ok_or(SerialError::NotConnected)?;

        let bytes = encode_line(text);
        if let Err(e) = write_all_flushed(&mut link.writer, &bytes).await {
            warn!(port = %link.port, error = %e, "serial write failed");
            return Err(SerialError::Transport(e.to_string()));
        }

        debug!(port = %link.port, bytes = bytes.len(), "serial line written");
        self.record(Direction::Sent, text.to_string());
        Ok(())
    }

    /// Cancels the read loop, waits for it to finish, then closes the port.
    ///
    /// Lines the read loop already decoded are kept in the log.
    ///
    /// # Returns
    /// `true` if a port was closed, `false` if there was nothing to do.
    pub async fn disconnect(&mut self) -> bool {
        let Some(link) = self.link.take() else {
            return false;
        };
        let Link {
            port,
            mut writer,
            shutdown_tx,
            reader_task,
            mut inbound,
        } = link;

        while let Ok(event) = inbound.try_recv() {
            if let ReadEvent::Line(text) = event {
                self.record(Direction::Received, text);
            }
        }

        let _ = shutdown_tx.send(true);
        drop(inbound);
        if let Err(e) = reader_task.await {
            warn!(port = %port, error = %e, "read loop did not exit cleanly");
        }

        if let Err(e) = writer.shutdown().await {
            debug!(port = %port, error = %e, "write half shutdown failed");
        }
        drop(writer);

        info!(port = %port, "serial port closed");
        self.publish(SessionEvent::Disconnected {
            reason: DisconnectReason::Requested,
        });
        true
    }

    /// Applies every read-loop event that is already waiting.
    ///
    /// Never blocks; meant to be called once per UI frame.
    ///
    /// # Returns
    /// Number of events applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(link) = self.link.as_mut() {
            match link.inbound.try_recv() {
                Ok(event) => {
                    self.apply(event);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.close_after_read(DisconnectReason::Failed(SerialError::Transport(
                        "read loop stopped unexpectedly".into(),
                    )));
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Waits for the next read-loop event and applies it.
    ///
    /// Returns `None` immediately when disconnected.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let link = self.link.as_mut()?;
        let event = link.inbound.recv().await;
        Some(match event {
            Some(event) => self.apply(event),
            None => self.close_after_read(DisconnectReason::Failed(SerialError::Transport(
                "read loop stopped unexpectedly".into(),
            ))),
        })
    }

    fn apply(&mut self, event: ReadEvent) -> SessionEvent {
        match event {
            ReadEvent::Line(text) => self.record(Direction::Received, text),
            ReadEvent::Ended => self.close_after_read(DisconnectReason::EndOfStream),
            ReadEvent::Failed(e) => self.close_after_read(DisconnectReason::Failed(e)),
        }
    }

    fn record(&mut self, direction: Direction, text: String) -> SessionEvent {
        let message = self.log.append(Message::new(direction, text)).clone();
        let event = SessionEvent::MessageAppended(message);
        self.publish(event.clone());
        event
    }

    /// Tears down after the read loop ended on its own. The task has already
    /// returned, so dropping the halves is all that is left.
    fn close_after_read(&mut self, reason: DisconnectReason) -> SessionEvent {
        if let Some(link) = self.link.take() {
            match &reason {
                DisconnectReason::Failed(e) => {
                    warn!(port = %link.port, error = %e, "serial read failed, port closed")
                }
                _ => info!(port = %link.port, "serial stream ended, port closed"),
            }
            let _ = link.shutdown_tx.send(true);
            drop(link);
        }
        let event = SessionEvent::Disconnected { reason };
        self.publish(event.clone());
        event
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.updates.send(event);
    }
}

impl Drop for SerialSession {
    fn drop(&mut self) {
        if let Some(link) = &self.link {
            let _ = link.shutdown_tx.send(true);
        }
    }
}

async fn write_all_flushed(writer: &mut PortWriter, bytes: &[u8]) -> std::io::Result<()> {
    writer.write_all(bytes).await?;
    writer.flush().await
}

/// Background task: reads chunks, decodes lines, forwards them.
async fn read_loop(
    mut reader: PortReader,
    mut decoder: LineDecoder,
    chunk_size: usize,
    mut shutdown_rx: watch::Receiver<bool>,
    tx: mpsc::Sender<ReadEvent>,
) {
    let mut buf = vec![0u8; chunk_size];
    debug!(chunk_size, "read loop started");

    loop {
        let read = tokio::select! {
            biased;
            _ = shutdown_rx.changed() => {
                debug!("read loop cancelled");
                return;
            }
            read = reader.read(&mut buf) => read,
        };

        match read {
            Ok(0) => {
                if let Some(line) = decoder.finish() {
                    let _ = tx.send(ReadEvent::Line(line)).await;
                }
                let _ = tx.send(ReadEvent::Ended).await;
                return;
            }
            Ok(n) => {
                for line in decoder.push(&buf[..n]) {
                    if tx.send(ReadEvent::Line(line)).await.is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                let _ = tx
                    .send(ReadEvent::Failed(SerialError::Transport(e.to_string())))
                    .await;
                return;
            }
        }
    }
}
