use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::engine::{CalendarWeek, CellStatus, GridGeometry, WEEKDAY_LABELS};
use crate::tui::theme;

/// Rows consumed above the grid inside the calendar panel: the top border
/// and the weekday label line. Reported back to the sizer after rendering.
pub const HEADER_ROWS: u16 = 2;

/// Render the weekly calendar grid at the given geometry.
///
/// Returns the header height actually used, for the sizer's refined pass.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    weeks: &[CalendarWeek],
    geometry: &GridGeometry,
) -> u16 {
    let block = Block::default()
        .title(Span::styled(" Calendar ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if weeks.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  No activity recorded yet",
            theme::dim(),
        )));
        frame.render_widget(empty, inner);
        return HEADER_ROWS;
    }

    let cell = (geometry.cell_size.max(1.0)) as u16;
    let gap = geometry.cell_spacing as u16;
    let row_width = geometry.row_width as u16;
    let grid_x = inner.x + inner.width.saturating_sub(row_width) / 2;

    // Weekday labels, centered over their columns.
    let mut label_spans = Vec::new();
    for (col, label) in WEEKDAY_LABELS.iter().enumerate() {
        if col > 0 {
            label_spans.push(Span::raw(" ".repeat(gap as usize)));
        }
        let pad = (cell as usize).saturating_sub(label.len());
        label_spans.push(Span::styled(
            format!("{}{}", label, " ".repeat(pad)),
            theme::dim(),
        ));
    }
    let labels_area = Rect::new(grid_x, inner.y, row_width.min(inner.width), 1);
    frame.render_widget(Paragraph::new(Line::from(label_spans)), labels_area);

    let mut row_y = inner.y + 1;
    let cell_height = (cell / 2).max(1); // terminal cells are ~2x taller than wide

    for week in weeks {
        if row_y + cell_height > inner.y + inner.height {
            break; // viewport too small for the remaining rows
        }
        for (col, day) in week.days.iter().enumerate() {
            if day.is_placeholder() {
                // Placeholder past the cutoff: blank slot, no border.
                continue;
            }
            let x = grid_x + col as u16 * (cell + gap);
            if x + cell > inner.x + inner.width {
                break; // viewport too narrow for the remaining columns
            }
            let cell_area = Rect::new(x, row_y, cell, cell_height);

            let (bg, label_style) = match day.status {
                CellStatus::Completed => (theme::GREEN, theme::bold()),
                CellStatus::Failed => (theme::RED, theme::bold()),
                CellStatus::Rest => (theme::REST, theme::dim()),
                CellStatus::Empty => unreachable!(),
            };
            let body = Paragraph::new(Line::from(Span::styled(
                day.label.clone(),
                label_style.bg(bg),
            )))
            .style(ratatui::style::Style::default().bg(bg));
            frame.render_widget(body, cell_area);
        }
        row_y += cell_height + if gap > 0 { 1 } else { 0 };
    }

    HEADER_ROWS
}
