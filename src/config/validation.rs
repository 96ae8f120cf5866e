//! Configuration validation engine.
//!
//! ## Responsibility
//! Validate semantic constraints on a parsed [`DashboardConfig`] that cannot
//! be expressed through the type system alone (range checks, URL shape).
//!
//! ## Guarantees
//! - Every validation rule has at least one test that triggers it
//! - Validation collects *all* errors before returning (no short-circuit)
//! - Error messages include the field path and the invalid value
//!
//! ## NOT Responsible For
//! - Parsing TOML (that belongs to `loader`)
//! - File I/O (that belongs to `loader`)

use super::DashboardConfig;

/// Errors arising from configuration parsing, validation, or I/O.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parsing failed.
    #[error("Parse error in {file}: {source}")]
    Parse {
        /// Path of the file that failed to parse.
        file: String,
        /// Underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },

    /// One or more semantic validation rules failed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A specific field has an out-of-range value.
    #[error("Field '{field}' has invalid value {value}: {reason}")]
    InvalidField {
        /// Dot-separated field path (e.g., "serial.baud_rate").
        field: String,
        /// String representation of the invalid value.
        value: String,
        /// Human-readable explanation of the constraint.
        reason: String,
    },

    /// File I/O error.
    #[error("IO error reading {file}: {source}")]
    Io {
        /// Path of the file that could not be read.
        file: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ConfigError {
    ConfigError::InvalidField {
        field: field.into(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Validate all semantic constraints on a [`DashboardConfig`].
///
/// # Arguments
///
/// * `config` - The parsed config to validate.
///
/// # Returns
///
/// - `Ok(())` if all constraints pass.
/// - `Err(Vec<ConfigError>)` with every violation found.
///
/// # Panics
///
/// This function never panics.
pub fn validate(config: &DashboardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // ── Serial ───────────────────────────────────────────────────────
    let serial = &config.serial;
    if serial.baud_rate == 0 {
        errors.push(invalid("serial.baud_rate", 0, "must be at least 1"));
    }
    if serial.max_line_length < 16 {
        errors.push(invalid(
            "serial.max_line_length",
            serial.max_line_length,
            "must be at least 16 bytes",
        ));
    }
    if serial.read_chunk_size == 0 {
        errors.push(invalid("serial.read_chunk_size", 0, "must be at least 1"));
    }
    if serial.event_capacity == 0 {
        errors.push(invalid("serial.event_capacity", 0, "must be at least 1"));
    }
    if let Some(port) = &serial.port {
        if port.trim().is_empty() {
            errors.push(invalid("serial.port", "\"\"", "port name must not be empty"));
        }
    }

    // ── Proxy ────────────────────────────────────────────────────────
    let proxy = &config.proxy;
    if !(proxy.target_url.starts_with("http://") || proxy.target_url.starts_with("https://")) {
        errors.push(invalid(
            "proxy.target_url",
            &proxy.target_url,
            "must start with http:// or https://",
        ));
    }
    if proxy.basic_capacity == 0 {
        errors.push(invalid("proxy.basic_capacity", 0, "must be at least 1"));
    }
    if proxy.advanced_capacity == 0 {
        errors.push(invalid("proxy.advanced_capacity", 0, "must be at least 1"));
    }

    // ── UI ───────────────────────────────────────────────────────────
    if !(10..=1000).contains(&config.ui.tick_rate_ms) {
        errors.push(invalid(
            "ui.tick_rate_ms",
            config.ui.tick_rate_ms,
            "must be between 10 and 1000",
        ));
    }

    // ── Simulation ───────────────────────────────────────────────────
    if config.simulation.heartbeat_secs == 0 {
        errors.push(invalid(
            "simulation.heartbeat_secs",
            0,
            "must be at least 1 second",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
