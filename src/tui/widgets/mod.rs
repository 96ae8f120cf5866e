//! # Module: TUI Widgets
//!
//! ## Responsibility
//! Individual rendering widgets for each dashboard section. Each widget is a pure
//! function that takes app state and a layout rect, and renders into a frame.
//!
//! ## Guarantees
//! - All widgets handle zero-data gracefully (empty state rendering)
//! - No widget panics on any input range
//! - Status and health colors are consistent across widgets

pub mod browser;
pub mod notifications;
pub mod serial;
pub mod status;
pub mod traffic;
