//! # Module: TUI Rendering
//!
//! ## Responsibility
//! Orchestrates the overall dashboard layout by dividing the terminal into regions
//! and delegating to individual widget renderers. Handles the minimum size guard,
//! the help overlay and the notification overlay.
//!
//! ## Guarantees
//! - Minimum size guard displays a centered message if terminal is too small
//! - No panics during rendering regardless of terminal dimensions

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{App, View, MIN_COLS, MIN_ROWS};
use super::widgets;
use crate::serial::ConnectionState;

/// Help popup width before clamping.
const HELP_WIDTH: u16 = 60;

/// Help popup height before clamping.
const HELP_HEIGHT: u16 = 24;

/// Renders the complete dashboard UI into the given frame.
///
/// # Arguments
/// * `f` - The Ratatui frame to render into.
/// * `app` - The application state to display.
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    // Minimum size guard
    if size.width < MIN_COLS || size.height < MIN_ROWS {
        draw_too_small(f, size);
        return;
    }

    let (badge, badge_color) = match app.session.state() {
        ConnectionState::Connected => ("\u{25cf} CONNECTED", Color::Green),
        ConnectionState::Disconnected => ("\u{25cb} DISCONNECTED", Color::Red),
    };
    let clock = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let title = Line::from(vec![
        Span::styled(
            " pico-dashboard ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("[{}] ", app.view.label()), Style::default().fg(Color::White)),
        Span::styled(
            format!("{badge} "),
            Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{clock} "), Style::default().fg(Color::DarkGray)),
    ]);

    let outer_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let hints = match app.view {
        View::Overview => " [q]uit [h]elp [Tab]view [c]onnect [d]isconnect [i]nput [s]proxy [/]filter ",
        View::Browser => " [q]uit [h]elp [Tab]view [g]o [r]eload [H]ome [t]ab [w]close [f]ilter ",
    };
    let footer = Line::from(vec![
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
        if app.paused {
            Span::styled(
                " PAUSED ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::raw("")
        },
    ]);
    let footer_block = Block::default().title_bottom(footer).borders(Borders::NONE);

    let inner = outer_block.inner(size);
    f.render_widget(outer_block, size);
    f.render_widget(footer_block, size);

    match app.view {
        View::Overview => draw_overview(f, inner, app),
        View::Browser => draw_browser(f, inner, app),
    }

    widgets::notifications::render(f, inner, app);

    if app.show_help {
        draw_help_overlay(f, size);
    }
}

/// Status grid on top, serial console and basic proxy side by side below.
fn draw_overview(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Status grid
            Constraint::Min(10),   // Serial + proxy
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    widgets::status::render(f, rows[0], app);
    widgets::serial::render(f, columns[0], app);
    widgets::traffic::render_basic(f, columns[1], app);
}

/// Browser on the left, proxy analytics on the right.
fn draw_browser(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    widgets::browser::render(f, columns[0], app);
    widgets::traffic::render_advanced(f, columns[1], app);
}

/// Renders the "terminal too small" warning.
fn draw_too_small(f: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too small: resize to at least {}x{}",
        MIN_COLS, MIN_ROWS
    );
    let current_size = format!("Current size: {}x{}", area.width, area.height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            msg,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            current_size,
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(para, area);
}

/// Centered popup rectangle, clamped to leave a 2-cell margin.
fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

/// Renders the help overlay.
fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let popup_area = centered_popup(area, HELP_WIDTH, HELP_HEIGHT);
    f.render_widget(Clear, popup_area);

    let key = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    };
    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(Color::White)))
    };

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Pico 2W proxy controller",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        heading("  General:"),
        key("    [q]/[Esc] Quit        [Ctrl+C] Force quit"),
        key("    [h] Toggle this help  [p] Pause simulators"),
        key("    [Tab] Switch view"),
        heading("  Serial:"),
        key("    [c] Connect           [d] Disconnect"),
        key("    [i] Type a command    [\u{2191}\u{2193}] Scroll log"),
        heading("  HTTPS proxy:"),
        key("    [s] Start / stop      [x] Clear log"),
        key("    [/] Filter            [u] Target URL"),
        key("    [f] Cycle category (analytics)"),
        heading("  Browser:"),
        key("    [g] Address bar       [r] Reload"),
        key("    [H] Home              [t] New tab"),
        key("    [w] Close tab         [[ ]] Previous / next tab"),
        key("    While typing: [Enter] apply  [Esc] cancel"),
        Line::from(""),
        Line::from(Span::styled(
            "  Press any key to close",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let para = Paragraph::new(help_text).block(block);
    f.render_widget(para, popup_area);
}
