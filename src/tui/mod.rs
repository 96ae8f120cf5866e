//! # Module: TUI Dashboard
//!
//! ## Responsibility
//! The terminal front end: a Ratatui dashboard with an overview (device
//! status, serial console, HTTPS proxy) and a browser view (mock browser,
//! proxy analytics). All state lives in [`app::App`]; renderers only read it.
//!
//! ## Guarantees
//! - No panics in any rendering or update path
//! - Clean terminal restore on exit, including on panic (see the binary)
//! - Graceful resize handling down to 100x30 minimum
//!
//! ## NOT Responsible For
//! - Serial I/O (delegates to `serial`)
//! - Generating simulated data (delegates to `sim` and `browser`)

pub mod app;
pub mod events;
pub mod ui;
pub mod widgets;
