//! Integration tests for loading dashboard configuration from disk.

use std::io::Write;
use std::time::Duration;

use pico_dashboard::config::loader::load_from_file;
use pico_dashboard::config::validation::validate;
use pico_dashboard::{ConfigError, DashboardConfig, LogFormat};

#[test]
fn test_full_file_populates_sections() {
    let mut file = tempfile::NamedTempFile::new().expect("test: tempfile");
    write!(
        file,
        r#"
[serial]
port = "/dev/ttyACM0"
baud_rate = 9600

[proxy]
target_url = "http://pico.local"
basic_capacity = 20

[ui]
tick_rate_ms = 250

[simulation]
seed = 42

[logging]
format = "json"
file = "dashboard.log"
"#
    )
    .expect("test: write");

    let config = load_from_file(file.path()).expect("test: load");
    assert_eq!(config.serial.port.as_deref(), Some("/dev/ttyACM0"));
    assert_eq!(config.serial.session_config().baud_rate, 9600);
    assert_eq!(config.proxy.target_url, "http://pico.local");
    assert_eq!(config.proxy.basic_capacity, 20);
    assert_eq!(config.proxy.advanced_capacity, 200);
    assert_eq!(config.ui.tick_rate(), Duration::from_millis(250));
    assert_eq!(config.simulation.seed, Some(42));
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(validate(&config).is_ok());
}

#[test]
fn test_empty_file_is_default() {
    let file = tempfile::NamedTempFile::new().expect("test: tempfile");
    let config = load_from_file(file.path()).expect("test: load");
    assert_eq!(config, DashboardConfig::default());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("test: tempdir");
    let result = load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_invalid_values_all_reported() {
    let mut file = tempfile::NamedTempFile::new().expect("test: tempfile");
    write!(
        file,
        "[serial]\nbaud_rate = 0\n\n[proxy]\ntarget_url = \"pico.local\"\n"
    )
    .expect("test: write");

    match load_from_file(file.path()) {
        Err(ConfigError::Validation(msg)) => {
            assert!(msg.contains("serial.baud_rate"), "{msg}");
            assert!(msg.contains("proxy.target_url"), "{msg}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_overrides_revalidated() {
    let mut config = DashboardConfig::default();
    config.ui.tick_rate_ms = 5;
    let errors = validate(&config).expect_err("test: should be invalid");
    assert_eq!(errors.len(), 1);
}
