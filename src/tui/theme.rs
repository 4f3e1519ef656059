use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(15, 18, 22);
pub const SURFACE: Color = Color::Rgb(24, 28, 34);
pub const BORDER: Color = Color::Rgb(45, 52, 62);
pub const TEXT: Color = Color::Rgb(214, 219, 224);
pub const TEXT_DIM: Color = Color::Rgb(122, 132, 144);
pub const GREEN: Color = Color::Rgb(94, 190, 120);
pub const RED: Color = Color::Rgb(214, 104, 90);
pub const TEAL: Color = Color::Rgb(86, 182, 194);
pub const REST: Color = Color::Rgb(52, 58, 66);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn accent() -> Style {
    Style::default().fg(TEAL)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}
