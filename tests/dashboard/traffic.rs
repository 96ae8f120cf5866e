//! Integration tests for the simulated proxy feeds.

use std::time::Duration;

use chrono::Local;
use pico_dashboard::sim::{
    format_bytes, HttpMethod, ProxyRequest, RandomSource, RequestCategory, StatusClass,
    TrafficFeed,
};

fn request(method: HttpMethod, url: &str, duration_ms: u64, bytes: u64) -> ProxyRequest {
    ProxyRequest {
        id: "abcdefghi".into(),
        timestamp: Local::now(),
        method,
        url: url.into(),
        status: 200,
        duration_ms,
        bytes: Some(bytes),
        intercepted: false,
        user_agent: None,
        from_tab: None,
    }
}

#[test]
fn test_basic_feed_capped_at_capacity() {
    let mut feed = TrafficFeed::basic(10, "https://api.example.com");
    feed.toggle();
    let mut source = RandomSource::new(Some(5));

    // Ten minutes at one request every 2-5 s overflows the cap.
    for _ in 0..600 {
        feed.advance(Duration::from_secs(1), &mut source);
    }
    assert_eq!(feed.len(), 10);
    assert_eq!(feed.capacity(), 10);
}

#[test]
fn test_advanced_feed_values_in_range() {
    let mut feed = TrafficFeed::advanced(200);
    let mut source = RandomSource::new(Some(9));
    let produced = feed.advance(Duration::from_secs(120), &mut source);

    assert!(!produced.is_empty());
    for r in feed.requests() {
        assert!(matches!(r.status, 200 | 404 | 500), "status {}", r.status);
        assert!((10..2010).contains(&r.duration_ms));
        let bytes = r.bytes.expect("test: advanced requests carry bytes");
        assert!((1024..52_224).contains(&bytes));
        assert_eq!(r.user_agent.as_deref(), Some("MicroBrowser/1.0"));
        assert_eq!(r.id.len(), 9);
    }
    let stats = feed.stats();
    assert_eq!(stats.total_requests, produced.len() as u64);
    assert!((2..10).contains(&stats.active_connections));
}

#[test]
fn test_requests_newest_first() {
    let mut feed = TrafficFeed::advanced(5);
    feed.record(request(HttpMethod::Get, "https://a.test/one", 10, 1));
    feed.record(request(HttpMethod::Get, "https://a.test/two", 10, 1));
    let urls: Vec<&str> = feed.requests().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.test/two", "https://a.test/one"]);
}

#[test]
fn test_stats_accumulate_and_survive_clear() {
    let mut feed = TrafficFeed::advanced(5);
    feed.record(request(HttpMethod::Get, "https://a.test/", 100, 1000));
    feed.record(request(HttpMethod::Get, "https://a.test/", 200, 500));
    let stats = feed.stats();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.total_bytes, 1500);
    assert_eq!(stats.avg_response_ms, 125);

    feed.clear();
    assert!(feed.is_empty());
    assert_eq!(feed.stats().total_requests, 2);
}

#[test]
fn test_category_and_text_filters_combine() {
    let mut feed = TrafficFeed::advanced(10);
    feed.record(request(HttpMethod::Get, "https://github.com/", 10, 1));
    feed.record(request(HttpMethod::Post, "https://api.github.com/api/users", 10, 1));
    feed.record(request(HttpMethod::Get, "https://cdn.test/css/style.css", 10, 1));
    feed.record(request(HttpMethod::Get, "https://cdn.test/js/app.js", 10, 1));

    assert_eq!(feed.category_count(RequestCategory::All), 4);
    assert_eq!(feed.category_count(RequestCategory::Pages), 1);
    assert_eq!(feed.category_count(RequestCategory::Api), 1);
    assert_eq!(feed.category_count(RequestCategory::Assets), 2);

    feed.set_category(RequestCategory::Assets);
    feed.set_filter("  CSS ");
    let visible = feed.visible();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].url, "https://cdn.test/css/style.css");

    feed.set_filter("post");
    assert!(feed.visible().is_empty());
    feed.set_category(RequestCategory::All);
    assert_eq!(feed.visible().len(), 1);
}

#[test]
fn test_category_cycle_wraps() {
    let mut feed = TrafficFeed::advanced(1);
    let seen: Vec<RequestCategory> = (0..4).map(|_| feed.cycle_category()).collect();
    assert_eq!(
        seen,
        vec![
            RequestCategory::Pages,
            RequestCategory::Api,
            RequestCategory::Assets,
            RequestCategory::All
        ]
    );
}

#[test]
fn test_status_classes_and_sizes() {
    assert_eq!(StatusClass::of(201), StatusClass::of(200));
    assert_ne!(StatusClass::of(404), StatusClass::of(200));
    assert_eq!(format_bytes(512), "512B");
    assert_eq!(format_bytes(2048), "2KB");
    assert_eq!(format_bytes(3 * 1024 * 1024), "3MB");
}
