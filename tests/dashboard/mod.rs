//! Integration tests for the dashboard front end.
//!
//! These tests drive [`App`](pico_dashboard::tui::app::App) the way the event
//! loop does: key events in, serial commands out, ticks advancing the
//! simulators. They also cover the proxy feeds, the mock browser and config
//! files on disk.

mod app_state;
mod browser;
mod config;
mod traffic;
