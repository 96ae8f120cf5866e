//! Integration tests for App state transitions driven by input events.

use std::sync::Arc;
use std::time::Duration;

use pico_dashboard::serial::{MemoryPort, MemoryPortProvider, SessionConfig};
use pico_dashboard::sim::{RandomSource, ScriptedSource};
use pico_dashboard::tui::app::{App, EditTarget, InputMode, NotificationLevel, View};
use pico_dashboard::tui::events::{apply_event, InputEvent};
use pico_dashboard::{ConnectionState, DashboardConfig, Direction, SerialSession};

fn app_with(provider: MemoryPortProvider) -> App {
    let session = SerialSession::new(Arc::new(provider), SessionConfig::default());
    App::new(
        session,
        &DashboardConfig::default(),
        Box::new(RandomSource::new(Some(11))),
    )
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        apply_event(app, InputEvent::Char(c));
    }
}

#[tokio::test]
async fn test_connect_type_send_disconnect_flow() {
    let provider = MemoryPortProvider::new();
    let (port, mut device) = MemoryPort::pair("mem0");
    provider.offer(port);
    let mut app = app_with(provider);

    let cmd = apply_event(&mut app, InputEvent::Connect).expect("test: connect command");
    app.run_serial(cmd).await;
    assert_eq!(app.session.state(), ConnectionState::Connected);
    assert!(app
        .notifications
        .iter()
        .any(|n| n.text == "Connected to mem0" && n.level == NotificationLevel::Success));

    apply_event(&mut app, InputEvent::BeginEdit(EditTarget::Command));
    type_text(&mut app, "status");
    let cmd = apply_event(&mut app, InputEvent::Submit).expect("test: send command");
    app.run_serial(cmd).await;

    assert_eq!(app.mode, InputMode::Normal);
    assert!(app.input.is_empty());
    assert_eq!(
        device.read_line().await.expect("test: read"),
        Some("status".to_string())
    );
    assert_eq!(app.session.log().count(Direction::Sent), 1);

    let cmd = apply_event(&mut app, InputEvent::Disconnect).expect("test: disconnect command");
    app.run_serial(cmd).await;
    assert_eq!(app.session.state(), ConnectionState::Disconnected);
    assert!(app
        .notifications
        .iter()
        .any(|n| n.text == "Disconnected from device"));
}

#[tokio::test]
async fn test_incoming_lines_arrive_on_tick() {
    let provider = MemoryPortProvider::new();
    let (port, mut device) = MemoryPort::pair("mem0");
    provider.offer(port);
    let mut app = app_with(provider);
    app.paused = true;

    let cmd = apply_event(&mut app, InputEvent::Connect).expect("test: connect command");
    app.run_serial(cmd).await;
    device.write_line("heartbeat 1").await.expect("test: write");

    let mut received = 0;
    for _ in 0..50 {
        app.on_tick(Duration::from_millis(10));
        received = app.session.log().count(Direction::Received);
        if received > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(received, 1);
    assert_eq!(app.session.log().last().map(|m| m.text()), Some("heartbeat 1"));
}

#[tokio::test]
async fn test_connect_without_ports_reports_error() {
    let mut app = app_with(MemoryPortProvider::new());
    let cmd = apply_event(&mut app, InputEvent::Connect).expect("test: connect command");
    app.run_serial(cmd).await;

    assert_eq!(app.session.state(), ConnectionState::Disconnected);
    let last = app.notifications.back().expect("test: notification");
    assert_eq!(last.level, NotificationLevel::Error);
}

#[tokio::test]
async fn test_send_while_disconnected_warns() {
    let mut app = app_with(MemoryPortProvider::new());
    apply_event(&mut app, InputEvent::BeginEdit(EditTarget::Command));
    type_text(&mut app, "ping");
    let cmd = apply_event(&mut app, InputEvent::Submit).expect("test: send command");
    app.run_serial(cmd).await;

    let last = app.notifications.back().expect("test: notification");
    assert_eq!(last.level, NotificationLevel::Warning);
    assert!(app.session.log().is_empty());
}

#[test]
fn test_blank_command_produces_nothing() {
    let mut app = app_with(MemoryPortProvider::new());
    apply_event(&mut app, InputEvent::BeginEdit(EditTarget::Command));
    type_text(&mut app, "   ");
    assert!(apply_event(&mut app, InputEvent::Submit).is_none());
    assert_eq!(app.mode, InputMode::Normal);
}

#[test]
fn test_help_overlay_swallows_keys() {
    let mut app = app_with(MemoryPortProvider::new());
    apply_event(&mut app, InputEvent::Help);
    assert!(app.show_help);

    // Connect is swallowed and only closes the overlay.
    assert!(apply_event(&mut app, InputEvent::Connect).is_none());
    assert!(!app.show_help);
    assert!(!app.should_quit);
}

#[test]
fn test_view_cycles_and_quit() {
    let mut app = app_with(MemoryPortProvider::new());
    assert_eq!(app.view, View::Overview);
    apply_event(&mut app, InputEvent::NextView);
    assert_eq!(app.view, View::Browser);
    apply_event(&mut app, InputEvent::NextView);
    assert_eq!(app.view, View::Overview);

    apply_event(&mut app, InputEvent::Quit);
    assert!(app.should_quit);
}

#[test]
fn test_pause_freezes_simulators() {
    let mut app = app_with(MemoryPortProvider::new());
    apply_event(&mut app, InputEvent::Pause);
    let before = app.advanced_feed.len();
    for _ in 0..100 {
        app.on_tick(Duration::from_millis(500));
    }
    assert_eq!(app.advanced_feed.len(), before);

    apply_event(&mut app, InputEvent::Pause);
    for _ in 0..100 {
        app.on_tick(Duration::from_millis(500));
    }
    assert!(app.advanced_feed.len() > before);
}

#[test]
fn test_proxy_toggle_generates_basic_traffic() {
    let mut app = app_with(MemoryPortProvider::new());
    assert!(!app.basic_feed.is_active());
    for _ in 0..20 {
        app.on_tick(Duration::from_secs(1));
    }
    assert!(app.basic_feed.is_empty());

    apply_event(&mut app, InputEvent::ToggleProxy);
    assert!(app.basic_feed.is_active());
    for _ in 0..20 {
        app.on_tick(Duration::from_secs(1));
    }
    assert!(!app.basic_feed.is_empty());
    assert!(app
        .basic_feed
        .requests()
        .all(|r| r.url.starts_with(app.basic_feed.target_url())));

    apply_event(&mut app, InputEvent::ClearProxy);
    assert!(app.basic_feed.is_empty());
}

#[test]
fn test_target_url_edit_rejects_bad_scheme() {
    let mut app = app_with(MemoryPortProvider::new());
    apply_event(&mut app, InputEvent::BeginEdit(EditTarget::TargetUrl));
    assert_eq!(app.input, app.basic_feed.target_url());

    app.input.clear();
    type_text(&mut app, "ftp://pico.local");
    apply_event(&mut app, InputEvent::Submit);
    assert_eq!(app.basic_feed.target_url(), "https://api.example.com");

    apply_event(&mut app, InputEvent::BeginEdit(EditTarget::TargetUrl));
    app.input.clear();
    type_text(&mut app, "http://pico.local/");
    apply_event(&mut app, InputEvent::Submit);
    assert_eq!(app.basic_feed.target_url(), "http://pico.local");
}

#[test]
fn test_address_bar_loads_page_and_records_request() {
    let session = SerialSession::new(
        Arc::new(MemoryPortProvider::new()),
        SessionConfig::default(),
    );
    let mut app = App::new(
        session,
        &DashboardConfig::default(),
        Box::new(ScriptedSource::new([0])),
    );
    let recorded = app.advanced_feed.len();

    apply_event(&mut app, InputEvent::BeginEdit(EditTarget::Address));
    app.input.clear();
    type_text(&mut app, "pico.local/status");
    apply_event(&mut app, InputEvent::Submit);

    assert_eq!(app.advanced_feed.len(), recorded + 1);
    let request = app.advanced_feed.requests().next().expect("test: request");
    assert_eq!(request.url, "https://pico.local/status");
    assert_eq!(request.from_tab.as_deref(), Some("Tab 1"));

    let tab = app.browser.active_tab().expect("test: tab");
    assert!(tab.loading);

    // Scripted delay is the 1000 ms minimum.
    app.on_tick(Duration::from_millis(1000));
    let tab = app.browser.active_tab().expect("test: tab");
    assert!(!tab.loading);
    assert_eq!(tab.title, "pico.local");
    assert!(app
        .notifications
        .iter()
        .any(|n| n.text == "Loaded pico.local via proxy"));
}

#[test]
fn test_notifications_expire() {
    let mut app = app_with(MemoryPortProvider::new());
    app.paused = true;
    app.notify(NotificationLevel::Info, "hello");
    app.on_tick(Duration::from_millis(100));
    assert_eq!(app.notifications.len(), 1);
    app.on_tick(Duration::from_secs(10));
    assert!(app.notifications.is_empty());
}
