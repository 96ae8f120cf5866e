//! # pico-dashboard
//!
//! Terminal dashboard for a serial-connected Raspberry Pi Pico 2W proxy
//! controller.
//!
//! ## Architecture
//!
//! One real contract and a set of cosmetic simulators:
//! ```text
//! PortProvider → SerialSession ──(read loop, mpsc)──→ MessageLog
//!                      │
//!                      └─(broadcast SessionEvent)─→ tui::App → widgets
//! TrafficFeed / Browser / status grid ──(EventSource)──→ tui::App
//! ```

// ── Lint policy ───────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(missing_docs)]

use std::fs::OpenOptions;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub mod browser;
pub mod config;
pub mod serial;
pub mod sim;
pub mod tui;

// Re-exports for convenience
pub use config::validation::ConfigError;
pub use config::{DashboardConfig, LogFormat, LoggingSection};
pub use serial::{ConnectionState, Direction, Message, SerialError, SerialSession, SessionEvent};

/// Initialise the global tracing subscriber from the `[logging]` section.
///
/// The terminal belongs to the UI, so events are written to
/// `logging.file`; without a file nothing is installed and `Ok(false)` is
/// returned. The `LOG_FORMAT` environment variable (`json` or `pretty`)
/// overrides the configured format. Filter level is controlled by
/// `RUST_LOG` (e.g. `RUST_LOG=pico_dashboard=debug`).
///
/// # Errors
///
/// - [`DashboardError::Io`] if the log file cannot be opened.
/// - [`DashboardError::Other`] if a global subscriber is already set.
///
/// # Panics
///
/// This function never panics.
pub fn init_tracing(logging: &LoggingSection) -> Result<bool, DashboardError> {
    let Some(path) = &logging.file else {
        return Ok(false);
    };

    let format = match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        Ok("pretty") => LogFormat::Pretty,
        _ => logging.format,
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let writer = Mutex::new(file);

    let result = match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(writer)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .pretty()
            .with_ansi(false)
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(writer)
            .try_init(),
    };

    result
        .map(|()| true)
        .map_err(|e| DashboardError::Other(format!("tracing init failed: {e}")))
}

/// Top-level dashboard errors.
///
/// Every error surface of the binary is mapped to a variant here.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The serial session failed.
    #[error("serial error: {0}")]
    Serial(#[from] SerialError),

    /// The configuration file could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Terminal or file I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for errors that do not fit a specific variant.
    #[error("{0}")]
    Other(String),
}
