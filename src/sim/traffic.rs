//! # Module: Proxy Traffic Feeds
//!
//! ## Responsibility
//! Synthesize the proxy request log shown by the dashboard. Two flavours:
//! the basic feed (toggleable, aimed at one target URL, marks intercepted
//! requests) and the advanced feed (multi-domain, byte counts, running stats,
//! category filter). Both are advanced by elapsed time.
//!
//! ## Guarantees
//! - The list never exceeds its capacity; newest request first
//! - An inactive feed never produces records on its own
//! - Every generated value stays inside its documented range
//!
//! ## NOT Responsible For
//! - Proxying anything; the records are fabricated

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Local};

use super::source::{short_id, EventSource};

/// Default target of the basic feed.
pub const DEFAULT_TARGET_URL: &str = "https://api.example.com";
/// Default capacity of the basic feed.
pub const BASIC_CAPACITY: usize = 100;
/// Default capacity of the advanced feed.
pub const ADVANCED_CAPACITY: usize = 200;
/// User agent stamped on advanced-feed records.
pub const USER_AGENT: &str = "MicroBrowser/1.0";

const BASIC_ENDPOINTS: [&str; 5] = ["/users", "/api/data", "/health", "/auth", "/proxy"];
const BASIC_STATUSES: [u16; 5] = [200, 201, 404, 500, 403];
const ADVANCED_DOMAINS: [&str; 4] = [
    "example.com",
    "api.github.com",
    "cdn.jsdelivr.net",
    "fonts.googleapis.com",
];
const ADVANCED_PATHS: [&str; 7] = [
    "/",
    "/api/users",
    "/static/css/main.css",
    "/api/data",
    "/images/logo.png",
    "/js/app.bundle.js",
    "/fonts/roboto.woff2",
];
const ASSET_MARKERS: [&str; 4] = [".css", ".js", ".png", ".woff"];

// ============================================================================
// Record types
// ============================================================================

/// HTTP method of a synthetic request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
}

impl HttpMethod {
    const BASIC: [HttpMethod; 4] = [Self::Get, Self::Post, Self::Put, Self::Delete];
    const ADVANCED: [HttpMethod; 5] = [Self::Get, Self::Post, Self::Put, Self::Delete, Self::Patch];

    /// Upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response class derived from a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx
    Success,
    /// 3xx
    Redirect,
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
    /// Anything else.
    Other,
}

impl StatusClass {
    /// Classifies `status`.
    pub fn of(status: u16) -> Self {
        match status {
            200..=299 => Self::Success,
            300..=399 => Self::Redirect,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Other,
        }
    }
}

/// Formats a byte count as `NB`, `NKB` or `NMB`, rounding to the nearest unit.
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    if bytes < 1024 {
        format!("{bytes}B")
    } else if bytes < 1024 * 1024 {
        format!("{}KB", (bytes as f64 / KIB).round() as u64)
    } else {
        format!("{}MB", (bytes as f64 / (KIB * KIB)).round() as u64)
    }
}

/// One synthetic proxied request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRequest {
    /// Nine-character base-36 id.
    pub id: String,
    /// When the record was produced.
    pub timestamp: DateTime<Local>,
    /// Request method.
    pub method: HttpMethod,
    /// Full request URL.
    pub url: String,
    /// Response status.
    pub status: u16,
    /// Round-trip duration in milliseconds.
    pub duration_ms: u64,
    /// Response size, advanced feed only.
    pub bytes: Option<u64>,
    /// Whether the basic proxy intercepted the request.
    pub intercepted: bool,
    /// Client user agent, advanced feed only.
    pub user_agent: Option<String>,
    /// Originating browser tab, advanced feed only.
    pub from_tab: Option<String>,
}

impl ProxyRequest {
    /// Response class of this request.
    pub fn status_class(&self) -> StatusClass {
        StatusClass::of(self.status)
    }

    /// Path component of the URL, without query or fragment. `/` when absent.
    pub fn path(&self) -> &str {
        let rest = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        let path = match rest.find('/') {
            Some(idx) => &rest[idx..],
            None => "/",
        };
        path.split(['?', '#']).next().unwrap_or("/")
    }
}

// ============================================================================
// Category filter
// ============================================================================

/// Category filter of the advanced feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestCategory {
    /// Everything.
    #[default]
    All,
    /// Page loads: GET, not an API call, no file extension.
    Pages,
    /// Anything under `/api/`.
    Api,
    /// Stylesheets, scripts, images and fonts.
    Assets,
}

impl RequestCategory {
    /// All categories in display order.
    pub const ALL: [RequestCategory; 4] = [Self::All, Self::Pages, Self::Api, Self::Assets];

    /// Short display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Pages => "Pages",
            Self::Api => "API",
            Self::Assets => "Assets",
        }
    }

    /// The category after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Pages,
            Self::Pages => Self::Api,
            Self::Api => Self::Assets,
            Self::Assets => Self::All,
        }
    }

    /// Whether `request` belongs to this category.
    pub fn matches(self, request: &ProxyRequest) -> bool {
        match self {
            Self::All => true,
            Self::Api => request.url.contains("/api/"),
            Self::Assets => ASSET_MARKERS.iter().any(|m| request.url.contains(m)),
            Self::Pages => {
                let path = request.path();
                let last = path.rsplit('/').next().unwrap_or("");
                request.method == HttpMethod::Get && !path.contains("/api/") && !last.contains('.')
            }
        }
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Running totals of the advanced feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrafficStats {
    /// Requests recorded since start (not capped).
    pub total_requests: u64,
    /// Sum of response sizes.
    pub total_bytes: u64,
    /// Smoothed response time in milliseconds.
    pub avg_response_ms: u64,
    /// Simulated open connections.
    pub active_connections: u32,
}

impl TrafficStats {
    fn observe(&mut self, request: &ProxyRequest) {
        // Halfway blend from a zero start, rounded half up.
        self.avg_response_ms = (self.avg_response_ms + request.duration_ms + 1) / 2;
        self.total_requests += 1;
        self.total_bytes += request.bytes.unwrap_or(0);
    }
}

// ============================================================================
// Feed
// ============================================================================

/// Which generator a feed runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Single-target feed with interception flag.
    Basic,
    /// Multi-domain feed with byte counts and stats.
    Advanced,
}

/// A capped, timer-driven log of synthetic proxy requests.
#[derive(Debug, Clone)]
pub struct TrafficFeed {
    kind: FeedKind,
    active: bool,
    target_url: String,
    capacity: usize,
    requests: VecDeque<ProxyRequest>,
    filter: String,
    category: RequestCategory,
    stats: TrafficStats,
    until_next: Option<Duration>,
}

impl TrafficFeed {
    /// Basic feed, inactive until toggled.
    pub fn basic(capacity: usize, target_url: impl Into<String>) -> Self {
        Self::with_kind(FeedKind::Basic, false, capacity, target_url.into())
    }

    /// Advanced feed, active from the start.
    pub fn advanced(capacity: usize) -> Self {
        Self::with_kind(FeedKind::Advanced, true, capacity, String::new())
    }

    fn with_kind(kind: FeedKind, active: bool, capacity: usize, target_url: String) -> Self {
        let capacity = capacity.max(1);
        Self {
            kind,
            active,
            target_url,
            capacity,
            requests: VecDeque::with_capacity(capacity),
            filter: String::new(),
            category: RequestCategory::All,
            stats: TrafficStats::default(),
            until_next: None,
        }
    }

    /// Generator flavour.
    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    /// Whether the timer is running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Starts or stops the timer; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        self.until_next = None;
        self.active
    }

    /// Target URL of the basic feed.
    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    /// Replaces the target URL; surrounding whitespace and trailing `/` are removed.
    pub fn set_target_url(&mut self, url: &str) {
        self.target_url = url.trim().trim_end_matches('/').to_string();
    }

    /// Maximum number of retained requests.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Retained requests, newest first.
    pub fn requests(&self) -> impl ExactSizeIterator<Item = &ProxyRequest> + '_ {
        self.requests.iter()
    }

    /// Drops every retained request. Stats are kept.
    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// Current text filter.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Sets the case-insensitive text filter matched against url and method.
    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.trim().to_string();
    }

    /// Current category filter.
    pub fn category(&self) -> RequestCategory {
        self.category
    }

    /// Sets the category filter.
    pub fn set_category(&mut self, category: RequestCategory) {
        self.category = category;
    }

    /// Advances to the next category filter and returns it.
    pub fn cycle_category(&mut self) -> RequestCategory {
        self.category = self.category.next();
        self.category
    }

    /// Retained requests in `category`, ignoring the text filter.
    pub fn category_count(&self, category: RequestCategory) -> usize {
        self.requests.iter().filter(|r| category.matches(r)).count()
    }

    /// Retained requests passing both filters, newest first.
    pub fn visible(&self) -> Vec<&ProxyRequest> {
        let needle = self.filter.to_lowercase();
        self.requests
            .iter()
            .filter(|r| self.category.matches(r))
            .filter(|r| {
                needle.is_empty()
                    || r.url.to_lowercase().contains(&needle)
                    || r.method.as_str().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Running totals.
    pub fn stats(&self) -> TrafficStats {
        self.stats
    }

    /// Advances the timer by `elapsed`, generating every request that fell due.
    ///
    /// # Returns
    /// Clones of the generated requests, oldest first.
    pub fn advance(&mut self, elapsed: Duration, source: &mut dyn EventSource) -> Vec<ProxyRequest> {
        let mut produced = Vec::new();
        if !self.active {
            return produced;
        }

        let mut remaining = elapsed;
        loop {
            let wait = match self.until_next {
                Some(wait) => wait,
                None => self.schedule(source),
            };
            if wait > remaining {
                self.until_next = Some(wait - remaining);
                break;
            }
            remaining -= wait;
            self.until_next = None;

            let request = self.generate(source);
            if self.kind == FeedKind::Advanced {
                self.stats.active_connections = source.between(2, 10) as u32;
            }
            self.record(request.clone());
            produced.push(request);
        }
        produced
    }

    /// Records a page load from the mock browser as a GET from `tab`.
    pub fn record_navigation(
        &mut self,
        url: &str,
        tab: &str,
        source: &mut dyn EventSource,
    ) -> ProxyRequest {
        let request = ProxyRequest {
            id: short_id(source),
            timestamp: Local::now(),
            method: HttpMethod::Get,
            url: url.to_string(),
            status: 200,
            duration_ms: source.between(10, 2010),
            bytes: Some(source.between(1024, 52_224)),
            intercepted: false,
            user_agent: Some(USER_AGENT.to_string()),
            from_tab: Some(tab.to_string()),
        };
        self.record(request.clone());
        request
    }

    /// Prepends `request`, evicting the oldest past capacity.
    pub fn record(&mut self, request: ProxyRequest) {
        self.stats.observe(&request);
        self.requests.push_front(request);
        self.requests.truncate(self.capacity);
    }

    fn schedule(&self, source: &mut dyn EventSource) -> Duration {
        let ms = match self.kind {
            FeedKind::Basic => source.between(2000, 5000),
            FeedKind::Advanced => source.between(1500, 3500),
        };
        Duration::from_millis(ms.max(1))
    }

    fn generate(&self, source: &mut dyn EventSource) -> ProxyRequest {
        match self.kind {
            FeedKind::Basic => {
                let method = HttpMethod::BASIC[source.pick(HttpMethod::BASIC.len())];
                let endpoint = BASIC_ENDPOINTS[source.pick(BASIC_ENDPOINTS.len())];
                let status = BASIC_STATUSES[source.pick(BASIC_STATUSES.len())];
                ProxyRequest {
                    id: short_id(source),
                    timestamp: Local::now(),
                    method,
                    url: format!("{}{}", self.target_url, endpoint),
                    status,
                    duration_ms: source.between(50, 1050),
                    bytes: None,
                    intercepted: source.chance(0.3),
                    user_agent: None,
                    from_tab: None,
                }
            }
            FeedKind::Advanced => {
                let method = HttpMethod::ADVANCED[source.pick(HttpMethod::ADVANCED.len())];
                let domain = ADVANCED_DOMAINS[source.pick(ADVANCED_DOMAINS.len())];
                let path = ADVANCED_PATHS[source.pick(ADVANCED_PATHS.len())];
                let status = if source.chance(0.9) {
                    200
                } else if source.chance(0.5) {
                    404
                } else {
                    500
                };
                ProxyRequest {
                    id: short_id(source),
                    timestamp: Local::now(),
                    method,
                    url: format!("https://{domain}{path}"),
                    status,
                    duration_ms: source.between(10, 2010),
                    bytes: Some(source.between(1024, 52_224)),
                    intercepted: false,
                    user_agent: Some(USER_AGENT.to_string()),
                    from_tab: Some(format!("Tab {}", source.between(1, 4))),
                }
            }
        }
    }
}
