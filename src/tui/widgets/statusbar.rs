use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::View;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, view: View, plan_available: bool) {
    let hints: &[(&str, &str)] = match view {
        View::Home => &[
            ("[p]", " progress  "),
            ("[?]", " help  "),
            ("[Esc]", " quit"),
        ],
        View::Progress => {
            if plan_available {
                &[
                    ("[f]", " filter (month/plan)  "),
                    ("[x]", " share  "),
                    ("[?]", " help  "),
                    ("[Esc]", " close"),
                ]
            } else {
                &[
                    ("[f]", " filter (no plan)  "),
                    ("[x]", " share  "),
                    ("[?]", " help  "),
                    ("[Esc]", " close"),
                ]
            }
        }
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(*key, theme::accent()));
        spans.push(Span::styled(*label, theme::dim()));
    }

    let line = Line::from(spans);
    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
