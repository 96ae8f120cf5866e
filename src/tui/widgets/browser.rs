//! # Widget: Mock Browser
//!
//! ## Responsibility
//! Renders the tab strip, the address bar (editable with `g`) and the page
//! of the active tab.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::serial::truncate_with_ellipsis;
use crate::browser::Tab;
use crate::tui::app::{App, EditTarget, InputMode};

/// Maximum characters of a tab title in the strip.
const TAB_TITLE_WIDTH: usize = 16;

/// Security glyph for a tab: lock for https, globe otherwise.
pub fn security_symbol(tab: &Tab) -> &'static str {
    if tab.url.is_empty() {
        "\u{25cb}" // ○
    } else if tab.secure {
        "\u{1f512}" // 🔒
    } else {
        "\u{1f310}" // 🌐
    }
}

/// Renders the browser widget.
///
/// # Arguments
/// * `f` - Ratatui frame to render into.
/// * `area` - Rectangular area allocated for this widget.
/// * `app` - Application state containing the browser.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" MICRO BROWSER ")
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

    let browser = &app.browser;
    let active = browser.active_id();

    let strip: Vec<Span> = browser
        .tabs()
        .iter()
        .map(|tab| {
            let title = if tab.loading {
                "Loading...".to_string()
            } else {
                truncate_with_ellipsis(&tab.title, TAB_TITLE_WIDTH)
            };
            let style = if tab.id == active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!(" {title} "), style)
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(strip)), chunks[0]);

    let tab = browser.active_tab();
    let nav_style = Style::default().fg(Color::DarkGray);
    let back = if browser.can_go_back() { "\u{2190}" } else { "\u{00b7}" };
    let forward = if browser.can_go_forward() { "\u{2192}" } else { "\u{00b7}" };
    let address = match app.mode {
        InputMode::Editing(EditTarget::Address) => Line::from(vec![
            Span::styled(
                format!("{} ", EditTarget::Address.label()),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(app.input.as_str()),
            Span::styled("\u{2588}", Style::default().fg(Color::Yellow)),
        ]),
        _ => {
            let (symbol, url) = match tab {
                Some(t) if !t.url.is_empty() => (security_symbol(t), t.url.as_str()),
                _ => ("\u{25cb}", "[g] enter an address"),
            };
            Line::from(vec![
                Span::styled(format!("{back} {forward} "), nav_style),
                Span::raw(format!("{symbol} ")),
                Span::styled(url, Style::default().fg(Color::White)),
            ])
        }
    };
    f.render_widget(Paragraph::new(address), chunks[1]);

    let body = match tab {
        Some(t) if t.loading => Paragraph::new(Span::styled(
            format!("Loading {} through proxy...", t.url),
            Style::default().fg(Color::Yellow),
        )),
        Some(t) if !t.content.is_empty() => Paragraph::new(t.content.as_str())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false }),
        _ => Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Pico 2W Micro Browser",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Pages load through the device's HTTPS proxy.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "[g] address  [H] home  [t] new tab  [w] close  [ ] switch",
                Style::default().fg(Color::DarkGray),
            )),
        ]),
    };
    f.render_widget(body, chunks[2]);
}
