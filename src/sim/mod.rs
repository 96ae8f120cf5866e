//! # Module: Simulation
//!
//! ## Responsibility
//! Cosmetic data behind the dashboard panels: proxy traffic feeds and the
//! static device status grid. Everything random flows through
//! [`EventSource`] so tests can script it.
//!
//! ## NOT Responsible For
//! - Real network traffic or real device telemetry

pub mod source;
pub mod status;
pub mod traffic;

pub use source::{short_id, EventSource, RandomSource, ScriptedSource};
pub use status::{device_metrics, network_tiles, Health, NetworkTile, SystemMetric};
pub use traffic::{
    format_bytes, FeedKind, HttpMethod, ProxyRequest, RequestCategory, StatusClass, TrafficFeed,
    TrafficStats, ADVANCED_CAPACITY, BASIC_CAPACITY, DEFAULT_TARGET_URL,
};
