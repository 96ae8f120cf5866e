//! # Widget: Device Status
//!
//! ## Responsibility
//! Renders the static device metric grid and the network activity strip.
//!
//! ## Guarantees
//! - Health colors are consistent: good=green, warning=yellow, critical=red
//! - Never panics on any area size

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::sim::{network_tiles, Health};
use crate::tui::app::App;

/// Returns the display color for a health rating.
pub fn health_color(health: Health) -> Color {
    match health {
        Health::Good => Color::Green,
        Health::Warning => Color::Yellow,
        Health::Critical => Color::Red,
    }
}

/// Renders the device status widget.
///
/// # Arguments
/// * `f` - Ratatui frame to render into.
/// * `area` - Rectangular area allocated for this widget.
/// * `app` - Application state containing the metric grid.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" PICO 2W STATUS ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(inner);

    let metric_lines: Vec<Line> = app
        .metrics
        .iter()
        .map(|m| {
            let color = health_color(m.health);
            Line::from(vec![
                Span::styled(format!("{} ", m.health.symbol()), Style::default().fg(color)),
                Span::styled(format!("{:<13}", m.label), Style::default().fg(Color::White)),
                Span::styled(
                    m.value,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(metric_lines), chunks[0]);

    let mut network_lines = vec![Line::from(Span::styled(
        "Network Activity",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))];
    network_lines.extend(network_tiles().iter().map(|tile| {
        Line::from(vec![
            Span::styled(format!("{:<13}", tile.label), Style::default().fg(Color::DarkGray)),
            Span::styled(tile.value, Style::default().fg(Color::White)),
        ])
    }));
    f.render_widget(Paragraph::new(network_lines), chunks[1]);
}
