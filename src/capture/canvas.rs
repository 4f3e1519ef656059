//! Fixed-canvas composition of the shareable snapshot.
//!
//! Draws the same calendar grid and metric cards as the live dashboard, but
//! at capture geometry on a portrait pixel canvas, so every export has
//! identical proportions regardless of the terminal it was taken from.

use crate::capture::font::{self, CHAR_H, CHAR_W};
use crate::config::{CaptureConfig, EngineConfig};
use crate::engine::{CalendarWeek, CellStatus, GridSizer, ProgressMetrics, WEEKDAY_LABELS};

struct Palette;
impl Palette {
    const BG: [u8; 3] = [15, 18, 22];
    const PANEL: [u8; 3] = [24, 28, 34];
    const BORDER: [u8; 3] = [45, 52, 62];
    const TEXT: [u8; 3] = [214, 219, 224];
    const TEXT_DIM: [u8; 3] = [122, 132, 144];
    const ACCENT: [u8; 3] = [94, 190, 120];
    const COMPLETED: [u8; 3] = [94, 190, 120];
    const FAILED: [u8; 3] = [214, 104, 90];
    const REST: [u8; 3] = [52, 58, 66];
    const CELL_LABEL: [u8; 3] = [10, 12, 15];
}

const MARGIN: u32 = 64;

/// RGB8 pixel canvas with the drawing primitives the composer needs.
pub struct SnapshotCanvas {
    width: u32,
    height: u32,
    buf: Vec<u8>,
}

impl SnapshotCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buf: vec![0u8; (width * height * 3) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Final pixel hand-off. A degenerate canvas yields no raster at all,
    /// which the share pipeline reports as a capture failure.
    pub fn rasterize(self) -> Option<Vec<u8>> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.buf)
    }

    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        if x < self.width && y < self.height {
            let idx = ((y * self.width + x) * 3) as usize;
            self.buf[idx..idx + 3].copy_from_slice(&color);
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * self.width + x) * 3) as usize;
        [self.buf[idx], self.buf[idx + 1], self.buf[idx + 2]]
    }

    fn clear(&mut self, color: [u8; 3]) {
        for chunk in self.buf.chunks_exact_mut(3) {
            chunk.copy_from_slice(&color);
        }
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: [u8; 3]) {
        for dy in 0..h {
            for dx in 0..w {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    fn hline(&mut self, x: u32, y: u32, w: u32, color: [u8; 3]) {
        for dx in 0..w {
            self.set_pixel(x + dx, y, color);
        }
    }

    fn draw_char(&mut self, x: u32, y: u32, ch: char, scale: u32, color: [u8; 3]) {
        let Some(rows) = font::glyph(ch) else {
            return;
        };
        for (row, &bits) in rows.iter().enumerate() {
            for col in 0..5u32 {
                if bits & (0x10 >> col) != 0 {
                    self.fill_rect(
                        x + col * scale,
                        y + row as u32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
    }

    fn draw_text(&mut self, x: u32, y: u32, text: &str, scale: u32, color: [u8; 3]) {
        for (i, ch) in text.chars().enumerate() {
            self.draw_char(x + i as u32 * CHAR_W * scale, y, ch, scale, color);
        }
    }

    fn draw_text_centered(&mut self, y: u32, text: &str, scale: u32, color: [u8; 3]) {
        let text_w = font::text_width(text, scale);
        let x = self.width.saturating_sub(text_w) / 2;
        self.draw_text(x, y, text, scale, color);
    }
}

/// Compose the full snapshot: header, calendar grid, metric cards, watermark.
pub fn compose(
    metrics: &ProgressMetrics,
    weeks: &[CalendarWeek],
    period_label: &str,
    engine: &EngineConfig,
    capture: &CaptureConfig,
) -> SnapshotCanvas {
    let mut canvas = SnapshotCanvas::new(capture.canvas_width, capture.canvas_height);
    canvas.clear(Palette::BG);

    let mut y = MARGIN;
    y = draw_header(&mut canvas, period_label, y);
    y = draw_calendar(&mut canvas, weeks, engine, capture, y);
    draw_metric_cards(&mut canvas, metrics, y);
    draw_watermark(&mut canvas, &capture.watermark);

    canvas
}

fn draw_header(canvas: &mut SnapshotCanvas, period_label: &str, y: u32) -> u32 {
    canvas.draw_text_centered(y, "STRIDE", 8, Palette::ACCENT);
    let y = y + CHAR_H * 8 + 8;
    canvas.draw_text_centered(y, period_label, 3, Palette::TEXT_DIM);
    y + CHAR_H * 3 + 24
}

fn draw_calendar(
    canvas: &mut SnapshotCanvas,
    weeks: &[CalendarWeek],
    engine: &EngineConfig,
    capture: &CaptureConfig,
    y: u32,
) -> u32 {
    let sizer = GridSizer::capture(
        engine.clone(),
        capture.cell_size as f32,
        capture.cell_gap as f32,
    );
    let geometry = sizer.geometry(weeks.len());
    let cell = geometry.cell_size as u32;
    let gap = geometry.cell_spacing as u32;
    let grid_x = canvas.width().saturating_sub(geometry.row_width as u32) / 2;

    // Weekday label row.
    for (col, label) in WEEKDAY_LABELS.iter().enumerate() {
        let cx = grid_x + col as u32 * (cell + gap);
        let tx = cx + (cell.saturating_sub(font::text_width(label, 2))) / 2;
        canvas.draw_text(tx, y, label, 2, Palette::TEXT_DIM);
    }
    let mut row_y = y + CHAR_H * 2 + 12;

    for week in weeks {
        for (col, day) in week.days.iter().enumerate() {
            let cx = grid_x + col as u32 * (cell + gap);
            let color = match day.status {
                CellStatus::Completed => Palette::COMPLETED,
                CellStatus::Failed => Palette::FAILED,
                CellStatus::Rest => Palette::REST,
                // Placeholder beyond the cutoff: a blank slot, no border.
                CellStatus::Empty => continue,
            };
            canvas.fill_rect(cx, row_y, cell, cell, color);
            let label_color = match day.status {
                CellStatus::Rest => Palette::TEXT_DIM,
                _ => Palette::CELL_LABEL,
            };
            canvas.draw_text(cx + 8, row_y + 8, &day.label, 2, label_color);
        }
        row_y += cell + gap;
    }

    row_y + 24
}

fn draw_metric_cards(canvas: &mut SnapshotCanvas, metrics: &ProgressMetrics, y: u32) {
    let cards: [(&str, String); 6] = [
        ("COMPLETION", format!("{}%", metrics.completion_percentage)),
        ("BEST STREAK", format!("{}d", metrics.longest_success_streak)),
        ("CONSISTENCY", format!("{:.0}%", metrics.consistency_rate)),
        ("AVG PROGRESS", format!("{:.0}%", metrics.average_progress)),
        ("BEST DAY", format!("{}%", metrics.best_day_percentage)),
        (
            "ACTIVE DAYS",
            format!("{}/{}", metrics.days_with_activity, metrics.total_days),
        ),
    ];

    let columns = 3u32;
    let gap = 24u32;
    let card_w = canvas
        .width()
        .saturating_sub(2 * MARGIN + (columns - 1) * gap)
        / columns;
    let card_h = 130u32;

    for (i, (label, value)) in cards.into_iter().enumerate() {
        let col = i as u32 % columns;
        let row = i as u32 / columns;
        let x = MARGIN + col * (card_w + gap);
        let cy = y + row * (card_h + gap);

        canvas.fill_rect(x, cy, card_w, card_h, Palette::PANEL);
        canvas.hline(x, cy, card_w, Palette::BORDER);
        canvas.hline(x, cy + card_h - 1, card_w, Palette::BORDER);
        canvas.draw_text(x + 16, cy + 18, label, 2, Palette::TEXT_DIM);
        canvas.draw_text(x + 16, cy + 18 + CHAR_H * 2 + 10, &value, 5, Palette::TEXT);
    }
}

fn draw_watermark(canvas: &mut SnapshotCanvas, watermark: &str) {
    let y = canvas.height().saturating_sub(MARGIN);
    let line_y = y.saturating_sub(16);
    canvas.hline(
        MARGIN,
        line_y,
        canvas.width().saturating_sub(2 * MARGIN),
        Palette::BORDER,
    );
    canvas.draw_text_centered(y, watermark, 2, Palette::TEXT_DIM);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{bucketize, metrics};
    use crate::models::DayRecord;
    use crate::models::DayStatus::{Rest, Success};

    fn fixtures() -> (ProgressMetrics, Vec<CalendarWeek>, EngineConfig, CaptureConfig) {
        let engine = EngineConfig::default();
        let records: Vec<DayRecord> = vec![
            DayRecord::new(1, 100, Success),
            DayRecord::new(2, 0, Rest),
            DayRecord::new(3, 90, Success),
        ];
        let m = metrics::compute(&records, &engine);
        let weeks = bucketize(&records, 31, &engine);
        (m, weeks, engine, CaptureConfig::default())
    }

    #[test]
    fn canvas_matches_configured_dimensions() {
        let (m, weeks, engine, capture) = fixtures();
        let canvas = compose(&m, &weeks, "August 2026", &engine, &capture);
        assert_eq!(canvas.width(), capture.canvas_width);
        assert_eq!(canvas.height(), capture.canvas_height);
        let pixels = canvas.rasterize().unwrap();
        assert_eq!(
            pixels.len(),
            (capture.canvas_width * capture.canvas_height * 3) as usize
        );
    }

    #[test]
    fn degenerate_canvas_yields_no_raster() {
        assert!(SnapshotCanvas::new(0, 100).rasterize().is_none());
        assert!(SnapshotCanvas::new(100, 0).rasterize().is_none());
    }

    #[test]
    fn background_is_painted() {
        let (m, weeks, engine, capture) = fixtures();
        let canvas = compose(&m, &weeks, "August 2026", &engine, &capture);
        assert_eq!(canvas.pixel(0, 0), Palette::BG);
        assert_eq!(
            canvas.pixel(capture.canvas_width - 1, capture.canvas_height - 1),
            Palette::BG
        );
    }

    #[test]
    fn out_of_bounds_drawing_is_clipped() {
        let mut canvas = SnapshotCanvas::new(10, 10);
        canvas.fill_rect(8, 8, 20, 20, Palette::TEXT);
        canvas.draw_text(5, 5, "overflowing text", 3, Palette::TEXT);
        assert_eq!(canvas.rasterize().unwrap().len(), 10 * 10 * 3);
    }
}
