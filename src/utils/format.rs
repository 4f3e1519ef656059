use unicode_width::UnicodeWidthStr;

/// Format a ratio value as a whole-number percentage string.
pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value)
}

/// Format a streak length as "Nd".
pub fn format_streak(days: u32) -> String {
    format!("{}d", days)
}

/// Create a simple ASCII progress bar.
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Pad a label to a fixed display width, accounting for wide glyphs.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = text.width();
    if current >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_guards_empty_total() {
        assert_eq!(progress_bar(3, 0, 4), "░░░░");
    }

    #[test]
    fn progress_bar_caps_at_full() {
        assert_eq!(progress_bar(10, 5, 4), "████");
    }

    #[test]
    fn pad_accounts_for_display_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcd", 2), "abcd");
    }
}
