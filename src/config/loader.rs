//! Reading `dashboard.toml`.
//!
//! Every path out of here has been through [`validation::validate`]: a
//! config is either usable as-is or rejected with all of its problems at
//! once. The CLI layers its flags on top and calls [`ensure_valid`] again.

use std::path::Path;

use tracing::info;

use super::validation::{self, ConfigError};
use super::DashboardConfig;

/// Reads, parses and validates the config at `path`.
///
/// # Errors
/// [`ConfigError::Io`] when the file cannot be read, otherwise whatever
/// [`load_from_str`] reports. Errors name the file.
pub fn load_from_file(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let name = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        file: name.clone(),
        source,
    })?;

    let config = load_from_str(&content, &name)?;
    info!(path = %name, "configuration loaded");
    Ok(config)
}

/// Parses and validates TOML text. `source_name` labels parse errors.
///
/// # Errors
/// [`ConfigError::Parse`] for malformed TOML or mistyped fields,
/// [`ConfigError::Validation`] when values are out of range.
pub fn load_from_str(content: &str, source_name: &str) -> Result<DashboardConfig, ConfigError> {
    let config: DashboardConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        file: source_name.to_string(),
        source,
    })?;
    ensure_valid(&config)?;
    Ok(config)
}

/// Folds every field error of `config` into one [`ConfigError::Validation`],
/// one problem per line.
///
/// # Errors
/// [`ConfigError::Validation`] if any field is out of range.
pub fn ensure_valid(config: &DashboardConfig) -> Result<(), ConfigError> {
    validation::validate(config).map_err(|errors| {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        ConfigError::Validation(lines.join("\n"))
    })
}
