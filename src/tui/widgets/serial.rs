//! # Widget: Serial Console
//!
//! ## Responsibility
//! Renders the session's message log with a connection header and, while a
//! command is being typed, the input line. TX=cyan, RX=green.
//!
//! ## Guarantees
//! - Fixed-width timestamp column for alignment
//! - Long lines truncated with `…` rather than wrapping
//! - Newest messages at the bottom unless scrolled back
//! - Handles an empty log gracefully

use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::serial::{ConnectionState, Direction};
use crate::tui::app::{App, EditTarget, InputMode};

/// Returns the display color for a message direction.
pub fn direction_color(direction: Direction) -> Color {
    match direction {
        Direction::Sent => Color::Cyan,
        Direction::Received => Color::Green,
    }
}

/// Truncates a string to a maximum width in characters, adding `…` if truncated.
///
/// # Arguments
/// * `s` - The string to potentially truncate.
/// * `max_width` - Maximum character width.
///
/// # Returns
/// The string unchanged if it fits, or truncated with trailing `…`.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_width - 1).collect();
    out.push('\u{2026}');
    out
}

/// Renders the serial console widget.
///
/// # Arguments
/// * `f` - Ratatui frame to render into.
/// * `area` - Rectangular area allocated for this widget.
/// * `app` - Application state holding the session.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let (badge, badge_color) = match session.state() {
        ConnectionState::Connected => ("CONNECTED", Color::Green),
        ConnectionState::Disconnected => ("DISCONNECTED", Color::Red),
    };
    let port = session.port_name().unwrap_or("no port");

    let title = Line::from(vec![
        Span::raw(" SERIAL "),
        Span::styled(
            format!("{badge} "),
            Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{port} @ {} baud ", session.config().baud_rate),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    render_log(f, chunks[0], app);
    render_input(f, chunks[1], app);
}

fn render_log(f: &mut Frame, area: Rect, app: &App) {
    let log = app.session.log();
    if log.is_empty() {
        let hint = Paragraph::new(Line::from(Span::styled(
            "No messages yet. [c] connect, [i] type a command",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(hint, area);
        return;
    }

    let visible = area.height as usize;
    let max_width = area.width as usize;
    let skip_newest = app.serial_scroll.min(log.len().saturating_sub(1));

    let mut lines: Vec<Line> = log
        .iter()
        .rev()
        .skip(skip_newest)
        .take(visible)
        .map(|msg| {
            let color = direction_color(msg.direction());
            let prefix = format!("[{}] {}  ", msg.time_label(), msg.direction().label());
            let body = truncate_with_ellipsis(msg.text(), max_width.saturating_sub(prefix.len()));
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", msg.time_label()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{}  ", msg.direction().label()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(body, Style::default().fg(color)),
            ])
        })
        .collect();
    lines.reverse();

    f.render_widget(Paragraph::new(lines), area);
}

fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.mode {
        InputMode::Editing(EditTarget::Command) => Line::from(vec![
            Span::styled(
                format!("{} ", EditTarget::Command.label()),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(app.input.as_str()),
            Span::styled("\u{2588}", Style::default().fg(Color::Yellow)),
        ]),
        _ => Line::from(Span::styled(
            format!(
                "{} TX / {} RX",
                app.session.log().count(Direction::Sent),
                app.session.log().count(Direction::Received)
            ),
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_colors() {
        assert_eq!(direction_color(Direction::Sent), Color::Cyan);
        assert_eq!(direction_color(Direction::Received), Color::Green);
    }

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_exact_length() {
        assert_eq!(truncate_with_ellipsis("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate_with_ellipsis("hello world", 6), "hello\u{2026}");
    }

    #[test]
    fn test_truncate_width_one_and_zero() {
        assert_eq!(truncate_with_ellipsis("hello", 1), "\u{2026}");
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
    }

    #[test]
    fn test_truncate_multibyte_does_not_split_chars() {
        assert_eq!(truncate_with_ellipsis("42°C°C°C", 4), "42°\u{2026}");
    }
}
