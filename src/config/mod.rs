//! # Module: Dashboard Configuration
//!
//! ## Responsibility
//! Parse and validate the optional TOML file that tunes the dashboard:
//! ```text
//! pico-dashboard --config dashboard.toml
//! ```
//!
//! ## Guarantees
//! - Every section and field is optional; an empty file yields the defaults
//! - Validated: all semantic constraints are checked before a config is accepted
//! - Deterministic: same TOML input always produces the same `DashboardConfig`
//!
//! ## NOT Responsible For
//! - Command-line flags (the binary layers those on top)
//! - Opening ports or building the session (that belongs to `serial`)

pub mod loader;
pub mod validation;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::serial::{SessionConfig, DEFAULT_BAUD_RATE};
use crate::sim::{ADVANCED_CAPACITY, BASIC_CAPACITY, DEFAULT_TARGET_URL};

// ── Default value functions ──────────────────────────────────────────────

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_max_line_length() -> usize {
    4096
}

fn default_read_chunk_size() -> usize {
    256
}

fn default_event_capacity() -> usize {
    256
}

fn default_target_url() -> String {
    DEFAULT_TARGET_URL.to_string()
}

fn default_basic_capacity() -> usize {
    BASIC_CAPACITY
}

fn default_advanced_capacity() -> usize {
    ADVANCED_CAPACITY
}

/// Default frame/input poll interval: 100ms.
fn default_tick_rate_ms() -> u64 {
    100
}

/// Default notification lifetime: 4 seconds.
fn default_notification_ttl_ms() -> u64 {
    4000
}

fn default_heartbeat_secs() -> u64 {
    5
}

// ── Top-level config ─────────────────────────────────────────────────────

/// Root configuration of the dashboard.
///
/// # Example
///
/// ```toml
/// [serial]
/// port = "/dev/ttyACM0"
/// baud_rate = 115200
///
/// [logging]
/// format = "json"
/// file = "pico-dashboard.log"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Serial session settings.
    pub serial: SerialSection,
    /// Simulated proxy feeds.
    pub proxy: ProxySection,
    /// Terminal UI timing.
    pub ui: UiSection,
    /// Randomness and the demo device.
    pub simulation: SimulationSection,
    /// Log output.
    pub logging: LoggingSection,
}

/// `[serial]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SerialSection {
    /// Port to open. `None` grants the first available port.
    #[serde(default)]
    pub port: Option<String>,
    /// Line speed used when opening the port.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Longest line kept whole before it is force-flushed.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Bytes requested per read.
    #[serde(default = "default_read_chunk_size")]
    pub read_chunk_size: usize,
    /// Capacity of the read-loop and observer channels.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
            max_line_length: default_max_line_length(),
            read_chunk_size: default_read_chunk_size(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl SerialSection {
    /// Session settings derived from this section.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            baud_rate: self.baud_rate,
            max_line_length: self.max_line_length,
            read_chunk_size: self.read_chunk_size,
            event_capacity: self.event_capacity,
        }
    }
}

/// `[proxy]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxySection {
    /// Target of the basic feed.
    #[serde(default = "default_target_url")]
    pub target_url: String,
    /// Requests retained by the basic feed.
    #[serde(default = "default_basic_capacity")]
    pub basic_capacity: usize,
    /// Requests retained by the advanced feed.
    #[serde(default = "default_advanced_capacity")]
    pub advanced_capacity: usize,
}

impl Default for ProxySection {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            basic_capacity: default_basic_capacity(),
            advanced_capacity: default_advanced_capacity(),
        }
    }
}

/// `[ui]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UiSection {
    /// Input poll interval and simulator step, in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// How long a notification stays on screen, in milliseconds.
    #[serde(default = "default_notification_ttl_ms")]
    pub notification_ttl_ms: u64,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            notification_ttl_ms: default_notification_ttl_ms(),
        }
    }
}

impl UiSection {
    /// Tick rate as a [`Duration`].
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Notification lifetime as a [`Duration`].
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }
}

/// `[simulation]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationSection {
    /// Seed for reproducible simulated data. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Seconds between demo device heartbeats.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            seed: None,
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingSection {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
    /// Log file. Logging is off when absent, since stdout belongs to the UI.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable log output.
    #[default]
    Pretty,
    /// Structured JSON log output, one object per line.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: DashboardConfig = toml::from_str("").expect("test: empty TOML parses");
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.proxy.basic_capacity, 100);
        assert_eq!(config.proxy.advanced_capacity, 200);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
[serial]
port = "/dev/ttyACM0"

[simulation]
seed = 42
"#,
        )
        .expect("test: partial TOML parses");
        assert_eq!(config.serial.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(config.serial.max_line_length, 4096);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.heartbeat_secs, 5);
    }

    #[test]
    fn test_log_format_deserializes_from_snake_case() {
        let config: DashboardConfig =
            toml::from_str("[logging]\nformat = \"json\"").expect("test: json format");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        let result: Result<DashboardConfig, _> = toml::from_str("[logging]\nformat = \"xml\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_session_config_mirrors_serial_section() {
        let section = SerialSection {
            baud_rate: 9600,
            read_chunk_size: 64,
            ..SerialSection::default()
        };
        let session = section.session_config();
        assert_eq!(session.baud_rate, 9600);
        assert_eq!(session.read_chunk_size, 64);
        assert_eq!(session.max_line_length, 4096);
    }

    #[test]
    fn test_ui_durations() {
        let ui = UiSection::default();
        assert_eq!(ui.tick_rate(), Duration::from_millis(100));
        assert_eq!(ui.notification_ttl(), Duration::from_secs(4));
    }
}
