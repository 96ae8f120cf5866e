//! # Module: TUI App State
//!
//! ## Responsibility
//! Owns all dashboard state: the serial session, the simulated feeds, the
//! mock browser, the input line and the notification stack. The `App` struct
//! is the single source of truth for every widget's data and is passed by
//! reference to the renderers.
//!
//! ## Guarantees
//! - `VecDeque` collections are bounded and never grow unbounded
//! - `on_tick()` never blocks and never panics
//! - Only the session mutates the message log; the app merely observes it

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use crate::browser::Browser;
use crate::config::DashboardConfig;
use crate::serial::{DisconnectReason, SerialError, SerialSession, SessionEvent};
use crate::sim::{device_metrics, EventSource, SystemMetric, TrafficFeed};

/// Maximum number of notifications on screen at once.
pub const NOTIFICATIONS_CAP: usize = 8;

/// Longest accepted input line, in characters.
pub const INPUT_MAX_LEN: usize = 256;

/// Minimum terminal width for the dashboard to render.
pub const MIN_COLS: u16 = 100;

/// Minimum terminal height for the dashboard to render.
pub const MIN_ROWS: u16 = 30;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Status grid, serial console and basic proxy.
    Overview,
    /// Mock browser and advanced proxy feed.
    Browser,
}

impl View {
    /// The other view.
    pub fn next(self) -> Self {
        match self {
            Self::Overview => Self::Browser,
            Self::Browser => Self::Overview,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Browser => "Browser",
        }
    }
}

/// What the input line is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// Command sent to the device.
    Command,
    /// Text filter of the basic proxy feed.
    Filter,
    /// Target URL of the basic proxy feed.
    TargetUrl,
    /// Browser address bar.
    Address,
}

impl EditTarget {
    /// Prompt shown in front of the input line.
    pub fn label(self) -> &'static str {
        match self {
            Self::Command => "serial>",
            Self::Filter => "filter>",
            Self::TargetUrl => "target>",
            Self::Address => "url>",
        }
    }
}

/// Keyboard mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Single keys are hotkeys.
    Normal,
    /// Keys edit the input line.
    Editing(EditTarget),
}

/// A serial action that has to be awaited by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialCommand {
    /// Request and open a port.
    Connect,
    /// Close the open port.
    Disconnect,
    /// Send one line.
    Send(String),
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Neutral information.
    Info,
    /// Something worked.
    Success,
    /// Something needs attention.
    Warning,
    /// Something failed.
    Error,
}

impl NotificationLevel {
    /// Returns the display symbol for this level.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Info => "\u{2139}",    // ℹ
            Self::Success => "\u{2714}", // ✔
            Self::Warning => "\u{26a0}", // ⚠
            Self::Error => "\u{2716}",   // ✖
        }
    }
}

/// A transient message in the corner overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub text: String,
    /// Time on screen so far.
    pub age: Duration,
}

/// Primary application state for the TUI dashboard.
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Whether the simulators are paused (serial I/O keeps flowing).
    pub paused: bool,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Visible screen.
    pub view: View,
    /// Keyboard mode.
    pub mode: InputMode,
    /// Contents of the input line.
    pub input: String,
    /// Serial log scroll offset, in lines from the bottom.
    pub serial_scroll: usize,

    /// The serial session.
    pub session: SerialSession,
    session_events: broadcast::Receiver<SessionEvent>,

    /// Basic proxy feed (overview).
    pub basic_feed: TrafficFeed,
    /// Advanced proxy feed (browser view).
    pub advanced_feed: TrafficFeed,
    /// Mock browser.
    pub browser: Browser,
    /// Static device status grid.
    pub metrics: Vec<SystemMetric>,

    /// Notifications, oldest first.
    pub notifications: VecDeque<Notification>,
    notification_ttl: Duration,

    source: Box<dyn EventSource>,

    /// Input poll interval and simulator step.
    pub tick_rate: Duration,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("view", &self.view)
            .field("mode", &self.mode)
            .field("paused", &self.paused)
            .field("session", &self.session)
            .field("notifications", &self.notifications.len())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Creates the dashboard state around `session`.
    ///
    /// # Arguments
    /// * `session` - Serial session, normally disconnected.
    /// * `config` - Feed capacities, target URL and timings.
    /// * `source` - Randomness for every simulator.
    pub fn new(
        session: SerialSession,
        config: &DashboardConfig,
        source: Box<dyn EventSource>,
    ) -> Self {
        let session_events = session.subscribe();
        Self {
            should_quit: false,
            paused: false,
            show_help: false,
            view: View::Overview,
            mode: InputMode::Normal,
            input: String::new(),
            serial_scroll: 0,

            session,
            session_events,

            basic_feed: TrafficFeed::basic(
                config.proxy.basic_capacity,
                config.proxy.target_url.as_str(),
            ),
            advanced_feed: TrafficFeed::advanced(config.proxy.advanced_capacity),
            browser: Browser::new(),
            metrics: device_metrics(),

            notifications: VecDeque::with_capacity(NOTIFICATIONS_CAP),
            notification_ttl: config.ui.notification_ttl(),

            source,

            tick_rate: config.ui.tick_rate(),
        }
    }

    /// Pushes a notification, evicting the oldest if at capacity.
    pub fn notify(&mut self, level: NotificationLevel, text: impl Into<String>) {
        if self.notifications.len() >= NOTIFICATIONS_CAP {
            self.notifications.pop_front();
        }
        self.notifications.push_back(Notification {
            level,
            text: text.into(),
            age: Duration::ZERO,
        });
    }

    /// Advances everything time-driven by `elapsed`.
    ///
    /// Applies pending serial input, turns session events into
    /// notifications, expires old notifications and, unless paused, steps
    /// the feeds and the browser.
    pub fn on_tick(&mut self, elapsed: Duration) {
        self.session.pump();
        self.drain_session_events();

        for n in &mut self.notifications {
            n.age += elapsed;
        }
        let ttl = self.notification_ttl;
        self.notifications.retain(|n| n.age < ttl);

        if self.paused {
            return;
        }

        self.basic_feed.advance(elapsed, self.source.as_mut());
        self.advanced_feed.advance(elapsed, self.source.as_mut());
        for page in self.browser.advance(elapsed) {
            self.notify(
                NotificationLevel::Success,
                format!("Loaded {} via proxy", page.host),
            );
        }
    }

    fn drain_session_events(&mut self) {
        loop {
            match self.session_events.try_recv() {
                Ok(event) => self.on_session_event(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "session observer lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn on_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connected { port } => {
                self.serial_scroll = 0;
                self.notify(NotificationLevel::Success, format!("Connected to {port}"));
            }
            SessionEvent::Disconnected { reason } => match reason {
                DisconnectReason::Requested => {
                    self.notify(NotificationLevel::Info, "Disconnected from device");
                }
                DisconnectReason::EndOfStream => {
                    self.notify(NotificationLevel::Warning, "Device closed the connection");
                }
                DisconnectReason::Failed(e) => {
                    self.notify(NotificationLevel::Error, format!("Connection lost: {e}"));
                }
            },
            SessionEvent::MessageAppended(_) => {
                // Keep the view pinned unless the user scrolled away.
                if self.serial_scroll > 0 {
                    self.serial_scroll += 1;
                }
            }
        }
    }

    /// Performs a serial action and reports failures as notifications.
    pub async fn run_serial(&mut self, command: SerialCommand) {
        let result = match command {
            SerialCommand::Connect => self.session.connect().await,
            SerialCommand::Disconnect => {
                if !self.session.disconnect().await {
                    self.notify(NotificationLevel::Info, "Not connected");
                }
                Ok(())
            }
            SerialCommand::Send(text) => self.session.send(&text).await,
        };
        if let Err(e) = result {
            let level = match e {
                SerialError::NotConnected
                | SerialError::AlreadyConnected
                | SerialError::MultiLine => {
                    NotificationLevel::Warning
                }
                _ => NotificationLevel::Error,
            };
            self.notify(level, e.to_string());
        }
        self.drain_session_events();
    }

    /// Switches to editing `target`, prefilling the input line.
    pub fn begin_edit(&mut self, target: EditTarget) {
        self.input = match target {
            EditTarget::Command => String::new(),
            EditTarget::Filter => self.basic_feed.filter().to_string(),
            EditTarget::TargetUrl => self.basic_feed.target_url().to_string(),
            EditTarget::Address => self
                .browser
                .active_tab()
                .map(|t| t.url.clone())
                .unwrap_or_default(),
        };
        self.mode = InputMode::Editing(target);
    }

    /// Appends a character to the input line, up to [`INPUT_MAX_LEN`].
    pub fn push_char(&mut self, c: char) {
        if self.input.chars().count() < INPUT_MAX_LEN {
            self.input.push(c);
        }
    }

    /// Removes the last character of the input line.
    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Leaves editing mode, discarding the input line.
    pub fn cancel_edit(&mut self) {
        self.input.clear();
        self.mode = InputMode::Normal;
    }

    /// Leaves editing mode and applies the input line to its target.
    ///
    /// # Returns
    /// The serial command to run when the target was the command line.
    pub fn submit_edit(&mut self) -> Option<SerialCommand> {
        let InputMode::Editing(target) = self.mode else {
            return None;
        };
        let text = std::mem::take(&mut self.input);
        self.mode = InputMode::Normal;

        match target {
            EditTarget::Command => {
                if text.trim().is_empty() {
                    None
                } else {
                    Some(SerialCommand::Send(text))
                }
            }
            EditTarget::Filter => {
                self.basic_feed.set_filter(&text);
                None
            }
            EditTarget::TargetUrl => {
                let url = text.trim();
                if url.starts_with("http://") || url.starts_with("https://") {
                    self.basic_feed.set_target_url(url);
                    self.notify(NotificationLevel::Info, format!("Proxy target set to {url}"));
                } else {
                    self.notify(
                        NotificationLevel::Warning,
                        "Target URL must start with http:// or https://",
                    );
                }
                None
            }
            EditTarget::Address => {
                self.navigate(&text);
                None
            }
        }
    }

    /// Starts or stops the basic proxy feed.
    pub fn toggle_proxy(&mut self) {
        if self.basic_feed.toggle() {
            self.notify(NotificationLevel::Success, "HTTPS proxy activated");
        } else {
            self.notify(NotificationLevel::Info, "HTTPS proxy deactivated");
        }
    }

    /// Clears the basic proxy log.
    pub fn clear_proxy(&mut self) {
        self.basic_feed.clear();
    }

    /// Navigates the active tab and records the request.
    pub fn navigate(&mut self, input: &str) {
        if let Some(nav) = self.browser.navigate(input, self.source.as_mut()) {
            self.advanced_feed
                .record_navigation(&nav.url, &nav.tab_label, self.source.as_mut());
        }
    }

    /// Reloads the active tab.
    pub fn reload(&mut self) {
        if let Some(nav) = self.browser.reload(self.source.as_mut()) {
            self.advanced_feed
                .record_navigation(&nav.url, &nav.tab_label, self.source.as_mut());
        }
    }

    /// Sends the active tab home.
    pub fn home(&mut self) {
        if let Some(nav) = self.browser.home(self.source.as_mut()) {
            self.advanced_feed
                .record_navigation(&nav.url, &nav.tab_label, self.source.as_mut());
        }
    }

    /// Scrolls the serial log one line towards older messages.
    pub fn scroll_serial_up(&mut self) {
        let max = self.session.log().len().saturating_sub(1);
        self.serial_scroll = (self.serial_scroll + 1).min(max);
    }

    /// Scrolls the serial log one line towards newer messages.
    pub fn scroll_serial_down(&mut self) {
        self.serial_scroll = self.serial_scroll.saturating_sub(1);
    }
}
