//! # Widget: Notifications
//!
//! ## Responsibility
//! Draws the notification stack as an overlay in the top-right corner,
//! newest at the bottom.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::serial::truncate_with_ellipsis;
use crate::tui::app::{App, NotificationLevel};

/// Width of the overlay including borders.
const OVERLAY_WIDTH: u16 = 48;

/// Returns the display color for a notification level.
pub fn level_color(level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Info => Color::White,
        NotificationLevel::Success => Color::Green,
        NotificationLevel::Warning => Color::Yellow,
        NotificationLevel::Error => Color::Red,
    }
}

/// Area of the overlay for `count` notifications inside `area`.
pub fn overlay_area(area: Rect, count: usize) -> Rect {
    let width = OVERLAY_WIDTH.min(area.width.saturating_sub(2));
    let height = (count as u16 + 2).min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + 1;
    Rect::new(x, y, width, height)
}

/// Renders the notification overlay; nothing when there are none.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.notifications.is_empty() {
        return;
    }
    let popup = overlay_area(area, app.notifications.len());
    let text_width = popup.width.saturating_sub(4) as usize;

    let lines: Vec<Line> = app
        .notifications
        .iter()
        .map(|n| {
            let color = level_color(n.level);
            Line::from(vec![
                Span::styled(format!("{} ", n.level.symbol()), Style::default().fg(color)),
                Span::styled(
                    truncate_with_ellipsis(&n.text, text_width),
                    Style::default().fg(color),
                ),
            ])
        })
        .collect();

    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_anchored_top_right() {
        let area = Rect::new(0, 0, 120, 40);
        let popup = overlay_area(area, 3);
        assert_eq!(popup, Rect::new(71, 1, 48, 5));
    }

    #[test]
    fn test_overlay_clamped_to_small_area() {
        let area = Rect::new(0, 0, 20, 4);
        let popup = overlay_area(area, 8);
        assert_eq!(popup.width, 18);
        assert_eq!(popup.height, 2);
    }

    #[test]
    fn test_level_colors() {
        assert_eq!(level_color(NotificationLevel::Error), Color::Red);
        assert_eq!(level_color(NotificationLevel::Success), Color::Green);
    }
}
