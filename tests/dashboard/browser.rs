//! Integration tests for the mock browser's tab lifecycle.

use std::time::Duration;

use pico_dashboard::browser::{hostname, normalize_url, Browser, HOME_URL};
use pico_dashboard::sim::ScriptedSource;

#[test]
fn test_tab_lifecycle() {
    let mut b = Browser::new();
    let second = b.new_tab();
    let third = b.new_tab();
    assert_eq!(b.tabs().len(), 3);
    assert_eq!(b.active_id(), third);

    b.prev_tab();
    assert_eq!(b.active_id(), second);
    b.next_tab();
    b.next_tab();
    assert_eq!(b.active_id(), 1, "next wraps to the first tab");

    assert!(b.close_tab(second));
    assert!(!b.close_tab(second));
    assert_eq!(b.tabs().len(), 2);
    assert_eq!(b.active_id(), 1);

    assert!(b.close_active());
    assert_eq!(b.active_id(), third);
}

#[test]
fn test_closing_last_tab_opens_fresh_one() {
    let mut b = Browser::new();
    assert!(b.close_active());
    assert_eq!(b.tabs().len(), 1);
    let tab = b.active_tab().expect("test: tab");
    assert_ne!(tab.id, 1);
    assert!(tab.url.is_empty());
}

#[test]
fn test_loads_complete_independently_per_tab() {
    // First load waits 1000 ms, second 1500 ms.
    let mut source = ScriptedSource::new([0, 500]);
    let mut b = Browser::new();
    b.navigate("one.test", &mut source).expect("test: nav");
    let second = b.new_tab();
    b.navigate("two.test", &mut source).expect("test: nav");

    let loaded = b.advance(Duration::from_millis(1000));
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].host, "one.test");

    let loaded = b.advance(Duration::from_millis(500));
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].tab_id, second);
    assert!(b.advance(Duration::from_secs(5)).is_empty());
}

#[test]
fn test_home_and_reload_navigate() {
    let mut source = ScriptedSource::new([0]);
    let mut b = Browser::new();
    assert!(b.reload(&mut source).is_none(), "blank tab has nothing to reload");

    let nav = b.home(&mut source).expect("test: home");
    assert_eq!(nav.url, HOME_URL);
    b.advance(Duration::from_secs(3));
    let tab = b.active_tab().expect("test: tab");
    assert!(tab.secure);
    assert!(tab.content.contains("Domain: example.com"));

    let nav = b.reload(&mut source).expect("test: reload");
    assert_eq!(nav.url, HOME_URL);
    assert!(!b.can_go_back());
    assert!(!b.can_go_forward());
}

#[test]
fn test_url_helpers() {
    assert_eq!(normalize_url("pico.local"), "https://pico.local");
    assert_eq!(normalize_url("http://pico.local"), "http://pico.local");
    assert_eq!(hostname("https://user@pico.local:8443/a?b"), "pico.local");
}
