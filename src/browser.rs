//! # Module: Mock Browser
//!
//! ## Responsibility
//! Tab bookkeeping for the pretend browser whose page loads are "proxied"
//! through the device. Navigation produces a record for the advanced traffic
//! feed; the page itself arrives after a simulated delay.
//!
//! ## Guarantees
//! - There is always at least one tab, and exactly one tab is active
//! - Tab ids are never reused within a browser
//!
//! ## NOT Responsible For
//! - Fetching or rendering real pages

use std::time::Duration;

use crate::sim::EventSource;

/// Address loaded by the home action.
pub const HOME_URL: &str = "https://example.com";
/// Title of a tab that has never loaded anything.
pub const NEW_TAB_TITLE: &str = "New Tab";

/// One browser tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    /// Unique id, starting at 1.
    pub id: u64,
    /// Hostname of the loaded page, or [`NEW_TAB_TITLE`].
    pub title: String,
    /// Current address; empty for a new tab.
    pub url: String,
    /// Rendered page text.
    pub content: String,
    /// Whether a load is in flight.
    pub loading: bool,
    /// Whether the loaded page came over `https://`.
    pub secure: bool,
    pending: Option<Duration>,
}

impl Tab {
    fn blank(id: u64) -> Self {
        Self {
            id,
            title: NEW_TAB_TITLE.to_string(),
            url: String::new(),
            content: String::new(),
            loading: false,
            secure: false,
            pending: None,
        }
    }

    /// Label used when tagging proxy records, e.g. `Tab 2`.
    pub fn label(&self) -> String {
        format!("Tab {}", self.id)
    }
}

/// A navigation that has started; feed it to the traffic log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Tab the navigation happened in.
    pub tab_id: u64,
    /// Label of that tab.
    pub tab_label: String,
    /// Normalized URL being loaded.
    pub url: String,
}

/// A page load that has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    /// Tab the page landed in.
    pub tab_id: u64,
    /// Hostname of the page.
    pub host: String,
}

/// Tabbed mock browser.
#[derive(Debug, Clone)]
pub struct Browser {
    tabs: Vec<Tab>,
    active: u64,
    next_id: u64,
}

impl Default for Browser {
    fn default() -> Self {
        Self::new()
    }
}

impl Browser {
    /// A browser with one blank tab.
    pub fn new() -> Self {
        Self {
            tabs: vec![Tab::blank(1)],
            active: 1,
            next_id: 2,
        }
    }

    /// All tabs in display order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Id of the active tab.
    pub fn active_id(&self) -> u64 {
        self.active
    }

    /// The active tab.
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == self.active)
    }

    fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let active = self.active;
        self.tabs.iter_mut().find(|t| t.id == active)
    }

    /// Opens a blank tab, activates it and returns its id.
    pub fn new_tab(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.tabs.push(Tab::blank(id));
        self.active = id;
        id
    }

    /// Closes tab `id`. Returns `false` when no such tab exists.
    ///
    /// Closing the only tab leaves a fresh blank one. Closing the active tab
    /// activates the last remaining tab.
    pub fn close_tab(&mut self, id: u64) -> bool {
        let Some(idx) = self.tabs.iter().position(|t| t.id == id) else {
            return false;
        };
        if self.tabs.len() == 1 {
            self.new_tab();
        }
        self.tabs.remove(idx);
        if self.active == id {
            if let Some(last) = self.tabs.last() {
                self.active = last.id;
            }
        }
        true
    }

    /// Closes the active tab.
    pub fn close_active(&mut self) -> bool {
        self.close_tab(self.active)
    }

    /// Activates tab `id`. Returns `false` when no such tab exists.
    pub fn activate(&mut self, id: u64) -> bool {
        if self.tabs.iter().any(|t| t.id == id) {
            self.active = id;
            true
        } else {
            false
        }
    }

    /// Activates the tab to the right, wrapping.
    pub fn next_tab(&mut self) {
        self.step(1);
    }

    /// Activates the tab to the left, wrapping.
    pub fn prev_tab(&mut self) {
        self.step(self.tabs.len().saturating_sub(1));
    }

    fn step(&mut self, by: usize) {
        if let Some(idx) = self.tabs.iter().position(|t| t.id == self.active) {
            let next = (idx + by) % self.tabs.len();
            self.active = self.tabs[next].id;
        }
    }

    /// Starts loading `input` in the active tab.
    ///
    /// # Arguments
    /// * `input` - Address as typed; trimmed, `https://` added when no scheme.
    /// * `source` - Picks the load delay (1000–2999 ms).
    ///
    /// # Returns
    /// The navigation to record, or `None` for blank input.
    pub fn navigate(&mut self, input: &str, source: &mut dyn EventSource) -> Option<Navigation> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let url = normalize_url(trimmed);
        let delay = Duration::from_millis(source.between(1000, 3000));

        let tab = self.active_tab_mut()?;
        tab.url = url.clone();
        tab.loading = true;
        tab.pending = Some(delay);
        Some(Navigation {
            tab_id: tab.id,
            tab_label: tab.label(),
            url,
        })
    }

    /// Re-navigates the active tab to its current address, if it has one.
    pub fn reload(&mut self, source: &mut dyn EventSource) -> Option<Navigation> {
        let url = self.active_tab().map(|t| t.url.clone()).unwrap_or_default();
        self.navigate(&url, source)
    }

    /// Navigates the active tab to [`HOME_URL`].
    pub fn home(&mut self, source: &mut dyn EventSource) -> Option<Navigation> {
        self.navigate(HOME_URL, source)
    }

    /// History is not kept.
    pub fn can_go_back(&self) -> bool {
        false
    }

    /// History is not kept.
    pub fn can_go_forward(&self) -> bool {
        false
    }

    /// Advances pending loads by `elapsed` and finishes the ones that are due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<LoadedPage> {
        let mut loaded = Vec::new();
        for tab in &mut self.tabs {
            let Some(pending) = tab.pending else {
                continue;
            };
            if pending > elapsed {
                tab.pending = Some(pending - elapsed);
                continue;
            }
            let host = hostname(&tab.url).to_string();
            tab.pending = None;
            tab.loading = false;
            tab.secure = tab.url.starts_with("https://");
            tab.content = render_page(&tab.url);
            tab.title = host.clone();
            loaded.push(LoadedPage { tab_id: tab.id, host });
        }
        loaded
    }
}

/// Adds `https://` unless `input` already carries an http(s) scheme.
pub fn normalize_url(input: &str) -> String {
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

/// Host part of `url`, without scheme, credentials, port or path.
pub fn hostname(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    host_port.split(':').next().unwrap_or(host_port)
}

fn render_page(url: &str) -> String {
    let protocol = url.split_once("://").map(|(s, _)| s).unwrap_or("https");
    format!(
        "Proxied Content\n\n\
         This page was loaded through your Raspberry Pi Pico 2W HTTPS proxy!\n\n\
         Domain: {host}\n\
         Protocol: {protocol}:\n\n\
         [Secure Connection] [Proxy Active] [Encrypted]",
        host = hostname(url),
    )
}
