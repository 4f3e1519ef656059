use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::sync::mpsc;
use std::thread;

use crate::capture::{share_snapshot, CaptureError, FileSink, ShareOutcome};
use crate::config::AppConfig;
use crate::data::ProgressExport;
use crate::engine::{bucketize, metrics, CalendarWeek, GridSizer, ProgressMetrics};
use crate::models::DayRecord;
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{calendar, header, statusbar, summary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    /// The progress overlay: calendar grid plus metric cards.
    Progress,
}

/// Which source window the user asked for. The effective window may differ:
/// a plan selection silently falls back to month while no plan exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Month,
    Plan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoticeKind {
    Info,
    Success,
    Error,
}

/// One dismissible notice line; shown until the user clears it.
#[derive(Debug, Clone)]
struct Notice {
    text: String,
    kind: NoticeKind,
}

type ShareResult = Result<ShareOutcome, CaptureError>;

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub should_quit: bool,
    pub filter_mode: FilterMode,

    export: ProgressExport,
    cutoff_day: u32,
    show_help: bool,
    notice: Option<Notice>,

    // Derived state, recomputed whenever the effective window changes.
    records: Vec<DayRecord>,
    metrics: ProgressMetrics,
    weeks: Vec<CalendarWeek>,

    sizer: GridSizer,
    pending_header_height: Option<u16>,
    share_rx: Option<mpsc::Receiver<ShareResult>>,
}

impl App {
    pub fn new(config: AppConfig, export: ProgressExport, cutoff_day: u32) -> Self {
        let sizer = GridSizer::live(config.engine.clone());
        let mut app = App {
            view: View::Home,
            config,
            should_quit: false,
            filter_mode: FilterMode::Month,
            export,
            cutoff_day,
            show_help: false,
            notice: None,
            records: Vec::new(),
            metrics: ProgressMetrics::default(),
            weeks: Vec::new(),
            sizer,
            pending_header_height: None,
            share_rx: None,
        };
        app.refresh();
        app
    }

    pub fn has_plan(&self) -> bool {
        self.export.has_plan()
    }

    /// The window actually feeding the pipeline.
    pub fn effective_filter(&self) -> FilterMode {
        if self.filter_mode == FilterMode::Plan && self.has_plan() {
            FilterMode::Plan
        } else {
            FilterMode::Month
        }
    }

    pub fn period_label(&self) -> String {
        match self.effective_filter() {
            FilterMode::Month => Local::now().format("%B %Y").to_string(),
            FilterMode::Plan => "Current plan".to_string(),
        }
    }

    /// Recompute metrics and weeks from the effective source window.
    fn refresh(&mut self) {
        self.records = match self.effective_filter() {
            FilterMode::Month => self.export.month_records(),
            FilterMode::Plan => self.export.plan_records(),
        };
        self.metrics = metrics::compute(&self.records, &self.config.engine);
        self.weeks = bucketize(&self.records, self.cutoff_day, &self.config.engine);
    }

    pub fn toggle_filter(&mut self) {
        self.filter_mode = match self.filter_mode {
            FilterMode::Month => FilterMode::Plan,
            FilterMode::Plan => FilterMode::Month,
        };
        self.refresh();
    }

    pub fn open_progress(&mut self) {
        self.refresh();
        self.view = View::Progress;
    }

    /// Close the progress overlay. A share still in flight keeps running and
    /// releases its artifact in the worker, but its result is discarded.
    pub fn close_progress(&mut self) {
        self.view = View::Home;
        self.notice = None;
        self.share_rx = None;
    }

    // ─── Share flow ──────────────────────────────────────────────────────

    fn start_share(&mut self) {
        if self.share_rx.is_some() {
            return; // one capture at a time
        }

        let metrics = self.metrics;
        let weeks = self.weeks.clone();
        let label = self.period_label();
        let engine = self.config.engine.clone();
        let capture = self.config.capture.clone();

        let (tx, rx) = mpsc::channel();
        self.share_rx = Some(rx);
        self.notice = Some(Notice {
            text: "Capturing snapshot...".to_string(),
            kind: NoticeKind::Info,
        });

        thread::spawn(move || {
            let sink = FileSink::new(None);
            let result = share_snapshot(&metrics, &weeks, &label, &engine, &capture, &sink);
            // The receiver may be gone if the overlay already closed; the
            // artifact was still released inside the pipeline either way.
            let _ = tx.send(result);
        });
    }

    /// Pick up a finished share, if any. Called on tick.
    fn poll_share(&mut self) {
        let Some(rx) = &self.share_rx else {
            return;
        };
        let Ok(result) = rx.try_recv() else {
            return;
        };
        self.share_rx = None;
        self.notice = Some(match result {
            Ok(ShareOutcome::Delivered(path)) => Notice {
                text: format!("Snapshot saved to {}", path.display()),
                kind: NoticeKind::Success,
            },
            Ok(ShareOutcome::Cancelled) => Notice {
                text: "Share cancelled".to_string(),
                kind: NoticeKind::Info,
            },
            Err(CaptureError::ShareUnavailable) => Notice {
                text: "Sharing is not available here".to_string(),
                kind: NoticeKind::Error,
            },
            Err(err) => Notice {
                text: format!("Snapshot failed: {err}"),
                kind: NoticeKind::Error,
            },
        });
    }

    // ─── Input ───────────────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Resize(_, _) => {
                // The next draw re-observes the container; nothing to do
                // here beyond letting the sizer invalidate itself.
            }
            Event::Tick => self.poll_share(),
        }
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        // Some terminals report release and repeat events too; only presses
        // count here.
        if key.kind != KeyEventKind::Press {
            return;
        }

        // A visible notice swallows the dismiss keys first; the overlay
        // underneath stays open and usable.
        if self.notice.is_some()
            && matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('n'))
        {
            self.notice = None;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match self.view {
            View::Home => self.handle_home_key(key),
            View::Progress => self.handle_progress_key(key),
        }
    }

    fn handle_home_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('p') => {
                self.open_progress();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_progress_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.close_progress();
            }
            KeyCode::Char('f') => {
                self.toggle_filter();
            }
            KeyCode::Char('x') => {
                self.start_share();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    pub fn draw(&mut self, frame: &mut Frame) {
        match self.view {
            View::Home => self.draw_home(frame),
            View::Progress => self.draw_progress(frame),
        }

        if self.show_help {
            self.draw_help_overlay(frame);
        }

        if self.notice.is_some() {
            self.draw_notice(frame);
        }
    }

    fn draw_home(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header::HEIGHT),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        header::render(frame, outer_chunks[0], &self.period_label());
        statusbar::render(frame, outer_chunks[2], self.view, self.has_plan());

        let windows = if self.has_plan() {
            "month and plan windows loaded"
        } else {
            "month window loaded"
        };
        let body = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} recorded days, {}", self.metrics.total_days, windows),
                theme::dim(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", theme::dim()),
                Span::styled("[p]", theme::accent().add_modifier(Modifier::BOLD)),
                Span::styled(" to view your progress", theme::dim()),
            ]),
        ];
        let paragraph = Paragraph::new(body).alignment(Alignment::Center);
        frame.render_widget(paragraph, outer_chunks[1]);
    }

    fn draw_progress(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(header::HEIGHT),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        header::render(frame, outer_chunks[0], &self.period_label());
        statusbar::render(frame, outer_chunks[2], self.view, self.has_plan());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(outer_chunks[1]);

        // Two-phase measurement: the container observation may invalidate a
        // stale in-grid header height; the grid reports the height it used
        // and the refined geometry lands on the next pass.
        let cal_area = columns[0];
        self.sizer
            .observe_container(cal_area.width as f32, cal_area.height as f32);
        if self.sizer.needs_remeasure() {
            if let Some(height) = self.pending_header_height.take() {
                self.sizer.observe_header(height as f32);
            }
        }

        let geometry = self.sizer.geometry(self.weeks.len());
        let used_header = calendar::render(frame, cal_area, &self.weeks, &geometry);
        self.pending_header_height = Some(used_header);

        summary::render(frame, columns[1], &self.metrics);
    }

    fn draw_notice(&mut self, frame: &mut Frame) {
        let Some(notice) = &self.notice else {
            return;
        };
        let area = frame.area();
        let width = (notice.text.len() as u16 + 8).min(area.width.saturating_sub(4));
        let popup_area = Rect {
            x: area.width.saturating_sub(width) / 2,
            y: area.height.saturating_sub(6),
            width,
            height: 3,
        };

        frame.render_widget(Clear, popup_area);

        let (border, text_style) = match notice.kind {
            NoticeKind::Info => (theme::dim(), theme::dim()),
            NoticeKind::Success => (theme::green(), theme::green()),
            NoticeKind::Error => (theme::red(), theme::red()),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .style(theme::surface());

        let line = Line::from(vec![
            Span::styled(format!(" {} ", notice.text), text_style),
            Span::styled(" [n] dismiss", theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), popup_area);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: (area.height / 2).min(13),
        };

        frame.render_widget(Clear, popup_area);

        let entries = [
            ("[p]", "Open the progress overlay"),
            ("[f]", "Toggle month / plan window"),
            ("[x]", "Share a progress snapshot"),
            ("[n]", "Dismiss notice"),
            ("[?]", "Toggle help"),
            ("[Esc]", "Close overlay / quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, action) in entries {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<7}", key), theme::accent()),
                Span::styled(action, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::accent())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(config: AppConfig, export: ProgressExport, cutoff_day: u32) -> Result<()> {
    let mut app = App::new(config, export, cutoff_day);

    let mut terminal = ratatui::init();
    let events = EventHandler::new(250);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        let event = events.next()?;
        app.handle_event(&event);
        if app.should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn export_with_plan(plan: bool) -> ProgressExport {
        let month = serde_json::json!([
            {"day": 1, "percentage": 90, "status": "success"},
            {"day": 2, "percentage": 40, "status": "fail"}
        ]);
        let doc = if plan {
            serde_json::json!({ "month": month, "plan": {"values": [
                {"day": 1, "percentage": 85, "status": "success"}
            ]}})
        } else {
            serde_json::json!({ "month": month })
        };
        serde_json::from_value(doc).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn progress_overlay_opens_and_closes() {
        let mut app = App::new(AppConfig::default(), export_with_plan(false), 28);
        assert_eq!(app.view, View::Home);

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.view, View::Progress);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Home);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn plan_filter_falls_back_to_month_without_plan_data() {
        let mut app = App::new(AppConfig::default(), export_with_plan(false), 28);
        assert_eq!(app.effective_filter(), FilterMode::Month);

        app.toggle_filter();
        assert_eq!(app.filter_mode, FilterMode::Plan);
        // Silent fallback, not an error: month data keeps feeding the grid.
        assert_eq!(app.effective_filter(), FilterMode::Month);
        assert_eq!(app.metrics.total_days, 2);
    }

    #[test]
    fn toggling_filter_recomputes_derived_state() {
        let mut app = App::new(AppConfig::default(), export_with_plan(true), 28);
        assert_eq!(app.metrics.total_days, 2);

        app.toggle_filter();
        assert_eq!(app.effective_filter(), FilterMode::Plan);
        assert_eq!(app.metrics.total_days, 1);
        assert_eq!(app.weeks.len(), 1);
    }

    #[test]
    fn share_results_surface_as_dismissible_notices() {
        let mut app = App::new(AppConfig::default(), export_with_plan(false), 28);
        app.open_progress();

        let (tx, rx) = mpsc::channel();
        app.share_rx = Some(rx);
        tx.send(Err(CaptureError::ShareUnavailable)).unwrap();
        app.poll_share();

        let notice = app.notice.clone().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(app.share_rx.is_none());

        // Any dismiss key clears it; the overlay stays open and usable.
        press(&mut app, KeyCode::Char('n'));
        assert!(app.notice.is_none());
        assert_eq!(app.view, View::Progress);
        assert!(!app.should_quit);
    }

    #[test]
    fn cancelled_share_is_not_an_error_notice() {
        let mut app = App::new(AppConfig::default(), export_with_plan(false), 28);
        app.open_progress();

        let (tx, rx) = mpsc::channel();
        app.share_rx = Some(rx);
        tx.send(Ok(ShareOutcome::Cancelled)).unwrap();
        app.poll_share();

        assert_eq!(app.notice.clone().unwrap().kind, NoticeKind::Info);
    }

    #[test]
    fn closing_the_overlay_discards_a_late_share_result() {
        let mut app = App::new(AppConfig::default(), export_with_plan(false), 28);
        app.open_progress();

        let (tx, rx) = mpsc::channel();
        app.share_rx = Some(rx);
        app.close_progress();

        // The worker finishes after the close; nothing surfaces.
        let _ = tx.send(Ok(ShareOutcome::Delivered("late.png".into())));
        app.poll_share();
        assert!(app.notice.is_none());
        assert_eq!(app.view, View::Home);
    }

    #[test]
    fn cutoff_limits_visible_weeks() {
        let records: Vec<serde_json::Value> = (1..=31)
            .map(|d| serde_json::json!({"day": d, "percentage": 100, "status": "success"}))
            .collect();
        let export: ProgressExport =
            serde_json::from_value(serde_json::json!({ "month": records })).unwrap();

        let app = App::new(AppConfig::default(), export, 10);
        assert_eq!(app.weeks.len(), 2);
    }
}
