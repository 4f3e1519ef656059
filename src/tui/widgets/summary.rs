use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::engine::ProgressMetrics;
use crate::tui::theme;
use crate::utils::format::{format_percent, format_streak, pad_to_width, progress_bar};

/// Render the metric summary cards for the current window.
pub fn render(frame: &mut Frame, area: Rect, metrics: &ProgressMetrics) {
    let block = Block::default()
        .title(Span::styled(" Summary ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // completion
            Constraint::Length(2), // streak
            Constraint::Length(2), // consistency
            Constraint::Length(2), // average
            Constraint::Length(2), // best day
            Constraint::Min(0),    // activity split
        ])
        .split(inner);

    // Completion gets a bar like the quota widgets elsewhere.
    let bar_width = (inner.width.saturating_sub(4) as usize).min(24);
    let completion = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", theme::dim()),
            Span::styled(
                progress_bar(metrics.completed_days, metrics.total_days, bar_width),
                theme::green(),
            ),
            Span::styled(
                format!("  {}% complete", metrics.completion_percentage),
                theme::green().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(completion), rows[0]);

    render_stat(
        frame,
        rows[1],
        "Best streak",
        &format_streak(metrics.longest_success_streak),
        theme::green(),
    );
    render_stat(
        frame,
        rows[2],
        "Consistency",
        &format_percent(metrics.consistency_rate),
        theme::accent(),
    );
    render_stat(
        frame,
        rows[3],
        "Avg progress",
        &format_percent(metrics.average_progress),
        theme::accent(),
    );
    render_stat(
        frame,
        rows[4],
        "Best day",
        &format!("{}%", metrics.best_day_percentage),
        theme::accent(),
    );

    let split = Line::from(vec![
        Span::styled(
            format!(
                "  Active: {}/{}  ·  Done: {}  ·  Failed: {}  ·  Rest: {}",
                metrics.days_with_activity,
                metrics.total_days,
                metrics.completed_days,
                metrics.failed_days,
                metrics.rest_days
            ),
            theme::dim(),
        ),
    ]);
    frame.render_widget(Paragraph::new(split), rows[5]);
}

fn render_stat(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    value_style: ratatui::style::Style,
) {
    let line = Line::from(vec![
        Span::styled(format!("  {}", pad_to_width(label, 14)), theme::dim()),
        Span::styled(value.to_string(), value_style.add_modifier(Modifier::BOLD)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
