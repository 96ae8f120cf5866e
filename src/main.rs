//! # Binary: pico-dashboard
//!
//! ## Responsibility
//! Entry point for the terminal dashboard. Loads configuration, picks a port
//! provider, initializes the terminal, runs the event loop, and ensures a
//! clean exit.
//!
//! ## Usage
//! ```bash
//! pico-dashboard --demo                          # simulated Pico, no hardware
//! pico-dashboard --config dashboard.toml         # settings from a file
//! pico-dashboard --port /dev/ttyACM0 --baud 115200   # needs `--features hardware`
//! pico-dashboard --demo --seed 42                # reproducible simulated data
//! ```
//!
//! ## Guarantees
//! - Terminal state always restored on exit, even on panic
//! - Clean shutdown on q, Esc, or Ctrl+C; an open port is closed first

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::info;

use pico_dashboard::config::loader::{ensure_valid, load_from_file};
use pico_dashboard::serial::{DemoPortProvider, PortProvider, SerialSession};
use pico_dashboard::sim::RandomSource;
use pico_dashboard::tui::app::App;
use pico_dashboard::tui::events::{apply_event, poll_event};
use pico_dashboard::tui::ui;
use pico_dashboard::{init_tracing, DashboardConfig, DashboardError};

const USAGE: &str = "usage: pico-dashboard [--config <path>] [--port <name>] [--baud <n>] [--demo] [--seed <n>]";

/// CLI arguments for the dashboard binary.
#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    /// TOML configuration file.
    config: Option<PathBuf>,
    /// Serial port name, overriding the config file.
    port: Option<String>,
    /// Baud rate, overriding the config file.
    baud: Option<u32>,
    /// Talk to a simulated device instead of hardware.
    demo: bool,
    /// Seed for the simulators, overriding the config file.
    seed: Option<u64>,
    /// Print usage and exit.
    help: bool,
}

/// Parses command-line arguments (without the program name).
///
/// # Errors
/// Returns a message when a flag is missing its value or a number is invalid.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => cli.demo = true,
            "--help" | "-h" => cli.help = true,
            "--config" => cli.config = Some(PathBuf::from(value_of(&arg, args.next())?)),
            "--port" => cli.port = Some(value_of(&arg, args.next())?),
            "--baud" => {
                let raw = value_of(&arg, args.next())?;
                cli.baud = Some(raw.parse().map_err(|_| format!("invalid --baud value: {raw}"))?);
            }
            "--seed" => {
                let raw = value_of(&arg, args.next())?;
                cli.seed = Some(raw.parse().map_err(|_| format!("invalid --seed value: {raw}"))?);
            }
            _ => {} // Ignore unknown args
        }
    }

    Ok(cli)
}

fn value_of(flag: &str, value: Option<String>) -> Result<String, String> {
    value.ok_or_else(|| format!("{flag} needs a value"))
}

/// Loads the config file (or defaults) and layers the CLI flags on top.
fn build_config(cli: &CliArgs) -> Result<DashboardConfig, DashboardError> {
    let mut config = match &cli.config {
        Some(path) => load_from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(port) = &cli.port {
        config.serial.port = Some(port.clone());
    }
    if let Some(baud) = cli.baud {
        config.serial.baud_rate = baud;
    }
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }

    ensure_valid(&config)?;
    Ok(config)
}

/// Chooses where ports come from.
#[cfg(feature = "hardware")]
fn system_provider(config: &DashboardConfig) -> Arc<dyn PortProvider> {
    Arc::new(pico_dashboard::serial::SystemPortProvider::new(
        config.serial.port.clone(),
    ))
}

/// Chooses where ports come from.
#[cfg(not(feature = "hardware"))]
fn system_provider(_config: &DashboardConfig) -> Arc<dyn PortProvider> {
    Arc::new(pico_dashboard::serial::UnsupportedProvider)
}

/// Sets up the terminal for TUI rendering.
///
/// # Errors
/// Returns `io::Error` if terminal initialization fails.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restores the terminal to its original state.
///
/// # Errors
/// Returns `io::Error` if any terminal command fails.
fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{msg}\n{USAGE}");
            std::process::exit(2);
        }
    };
    if cli.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = build_config(&cli)?;
    init_tracing(&config.logging)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let _guard = rt.enter();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let provider: Arc<dyn PortProvider> = if cli.demo {
        Arc::new(DemoPortProvider::new(
            Duration::from_secs(config.simulation.heartbeat_secs),
            shutdown_rx,
        ))
    } else {
        system_provider(&config)
    };

    let session = SerialSession::new(provider, config.serial.session_config());
    let source = RandomSource::new(config.simulation.seed);
    let mut app = App::new(session, &config, Box::new(source));
    info!(demo = cli.demo, "dashboard starting");

    // Install panic hook that restores terminal before printing panic message
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            event::DisableMouseCapture
        );
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app, &rt);
    restore_terminal(&mut terminal)?;

    rt.block_on(app.session.disconnect());
    let _ = shutdown_tx.send(true);
    info!("dashboard stopped");

    if let Err(e) = result {
        eprintln!("dashboard error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

/// Runs the event loop until the user quits.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rt: &Runtime,
) -> Result<(), DashboardError> {
    let mut last_tick = Instant::now();

    loop {
        // Render
        terminal.draw(|f| ui::draw(f, app))?;

        // Poll input
        let event = poll_event(app.tick_rate, app.mode);
        if let Some(command) = apply_event(app, event) {
            rt.block_on(app.run_serial(command));
        }

        if app.should_quit {
            break;
        }

        // Data tick
        let elapsed = last_tick.elapsed();
        if elapsed >= app.tick_rate {
            app.on_tick(elapsed);
            last_tick = Instant::now();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        assert_eq!(parse_args(Vec::new()), Ok(CliArgs::default()));
    }

    #[test]
    fn test_parse_args_all_flags() {
        let cli = parse_args(args(&[
            "--config", "d.toml", "--port", "/dev/ttyACM0", "--baud", "9600", "--demo", "--seed",
            "42",
        ]))
        .expect("test: parse");
        assert_eq!(cli.config, Some(PathBuf::from("d.toml")));
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(cli.baud, Some(9600));
        assert!(cli.demo);
        assert_eq!(cli.seed, Some(42));
    }

    #[test]
    fn test_parse_args_rejects_bad_baud() {
        assert!(parse_args(args(&["--baud", "fast"])).is_err());
        assert!(parse_args(args(&["--seed"])).is_err());
    }

    #[test]
    fn test_parse_args_ignores_unknown() {
        let cli = parse_args(args(&["--verbose", "--demo"])).expect("test: parse");
        assert!(cli.demo);
    }

    #[test]
    fn test_build_config_applies_overrides() {
        let cli = CliArgs {
            port: Some("COM3".into()),
            baud: Some(57_600),
            seed: Some(1),
            ..CliArgs::default()
        };
        let config = build_config(&cli).expect("test: config");
        assert_eq!(config.serial.port.as_deref(), Some("COM3"));
        assert_eq!(config.serial.baud_rate, 57_600);
        assert_eq!(config.simulation.seed, Some(1));
    }

    #[test]
    fn test_build_config_rejects_zero_baud() {
        let cli = CliArgs {
            baud: Some(0),
            ..CliArgs::default()
        };
        assert!(matches!(build_config(&cli), Err(DashboardError::Config(_))));
    }
}
