use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

/// Fixed header height in rows (border + title + date line + border).
pub const HEIGHT: u16 = 5;

pub fn render(frame: &mut Frame, area: Rect, period_label: &str) {
    let today = Local::now();
    let date_str = today.format("%A, %b %d, %Y").to_string();

    let title_line = Line::from(vec![
        Span::styled("  stride  ", theme::accent().add_modifier(Modifier::BOLD)),
        Span::styled("training progress", theme::dim()),
    ]);

    let period_line = Line::from(vec![
        Span::styled(period_label.to_string(), theme::green()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(date_str, theme::dim()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::accent())
        .style(theme::base());

    let paragraph = Paragraph::new(vec![title_line, Line::from(""), period_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
