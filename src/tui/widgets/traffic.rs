//! # Widget: Proxy Traffic
//!
//! ## Responsibility
//! Renders both proxy feeds: the basic feed with its target URL, filter and
//! interception marks, and the advanced feed with stats and category tabs.
//!
//! ## Guarantees
//! - Status codes colored by class, consistently across both feeds
//! - Long URLs truncated with `…`
//! - Empty feeds render a hint instead of a blank box

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::serial::truncate_with_ellipsis;
use crate::sim::{format_bytes, ProxyRequest, RequestCategory, StatusClass};
use crate::tui::app::{App, EditTarget, InputMode};

/// Returns the display color for a status class.
pub fn status_color(class: StatusClass) -> Color {
    match class {
        StatusClass::Success => Color::Green,
        StatusClass::Redirect => Color::Blue,
        StatusClass::ClientError => Color::Yellow,
        StatusClass::ServerError => Color::Red,
        StatusClass::Other => Color::DarkGray,
    }
}

fn request_line(r: &ProxyRequest, width: usize, detailed: bool) -> Line<'static> {
    let status_style = Style::default().fg(status_color(r.status_class()));
    let mut spans = vec![
        Span::styled(
            format!("{} ", r.timestamp.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:<6} ", r.method.as_str()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", r.status), status_style),
        Span::styled(
            format!("{:>5}ms ", r.duration_ms),
            Style::default().fg(Color::White),
        ),
    ];
    let mut used = 9 + 7 + 4 + 8;

    if detailed {
        let size = format!("{:>6} ", r.bytes.map(format_bytes).unwrap_or_default());
        used += size.len();
        spans.push(Span::styled(size, Style::default().fg(Color::Magenta)));
    } else if r.intercepted {
        used += 2;
        spans.push(Span::styled("\u{26a1} ", Style::default().fg(Color::Yellow)));
    }

    let mut url_width = width.saturating_sub(used);
    if detailed {
        if let Some(tab) = &r.from_tab {
            url_width = url_width.saturating_sub(tab.len() + 1);
            spans.push(Span::raw(truncate_with_ellipsis(&r.url, url_width)));
            spans.push(Span::styled(
                format!(" {tab}"),
                Style::default().fg(Color::DarkGray),
            ));
            return Line::from(spans);
        }
    }
    spans.push(Span::raw(truncate_with_ellipsis(&r.url, url_width)));
    Line::from(spans)
}

/// Renders the basic proxy widget.
///
/// # Arguments
/// * `f` - Ratatui frame to render into.
/// * `area` - Rectangular area allocated for this widget.
/// * `app` - Application state containing the basic feed.
pub fn render_basic(f: &mut Frame, area: Rect, app: &App) {
    let feed = &app.basic_feed;
    let (badge, color) = if feed.is_active() {
        ("ACTIVE", Color::Green)
    } else {
        ("INACTIVE", Color::DarkGray)
    };
    let block = Block::default()
        .title(Line::from(vec![
            Span::raw(" HTTPS PROXY "),
            Span::styled(
                format!("{badge} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let header = match app.mode {
        InputMode::Editing(target @ (EditTarget::Filter | EditTarget::TargetUrl)) => {
            Line::from(vec![
                Span::styled(format!("{} ", target.label()), Style::default().fg(Color::Yellow)),
                Span::raw(app.input.as_str()),
                Span::styled("\u{2588}", Style::default().fg(Color::Yellow)),
            ])
        }
        _ => {
            let filter = if feed.filter().is_empty() {
                String::new()
            } else {
                format!("  filter: {}", feed.filter())
            };
            Line::from(vec![
                Span::styled("target ", Style::default().fg(Color::DarkGray)),
                Span::styled(feed.target_url(), Style::default().fg(Color::White)),
                Span::styled(filter, Style::default().fg(Color::Yellow)),
            ])
        }
    };
    f.render_widget(Paragraph::new(header), chunks[0]);

    let visible = feed.visible();
    if visible.is_empty() {
        let hint = if feed.is_active() {
            "Waiting for requests..."
        } else {
            "Proxy stopped. [s] start"
        };
        f.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
            chunks[1],
        );
        return;
    }

    let width = chunks[1].width as usize;
    let lines: Vec<Line> = visible
        .into_iter()
        .take(chunks[1].height as usize)
        .map(|r| request_line(r, width, false))
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[1]);
}

/// Renders the advanced proxy analytics widget.
///
/// # Arguments
/// * `f` - Ratatui frame to render into.
/// * `area` - Rectangular area allocated for this widget.
/// * `app` - Application state containing the advanced feed.
pub fn render_advanced(f: &mut Frame, area: Rect, app: &App) {
    let feed = &app.advanced_feed;
    let block = Block::default()
        .title(" PROXY ANALYTICS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let stats = feed.stats();
    let stats_line = Line::from(vec![
        Span::styled(
            format!("{} req", stats.total_requests),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format_bytes(stats.total_bytes),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("avg {}ms", stats.avg_response_ms),
            Style::default().fg(Color::Blue),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} conns", stats.active_connections),
            Style::default().fg(Color::Green),
        ),
    ]);
    f.render_widget(Paragraph::new(stats_line), chunks[0]);

    let mut tabs = Vec::new();
    for category in RequestCategory::ALL {
        let label = format!(" {} ({}) ", category.label(), feed.category_count(category));
        let style = if category == feed.category() {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tabs.push(Span::styled(label, style));
    }
    f.render_widget(Paragraph::new(Line::from(tabs)), chunks[1]);

    let visible = feed.visible();
    if visible.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(
                "No requests in this category",
                Style::default().fg(Color::DarkGray),
            )),
            chunks[2],
        );
        return;
    }

    let width = chunks[2].width as usize;
    let lines: Vec<Line> = visible
        .into_iter()
        .take(chunks[2].height as usize)
        .map(|r| request_line(r, width, true))
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[2]);
}
