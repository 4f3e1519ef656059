use crate::config::EngineConfig;
use crate::models::DayRecord;

pub const DAYS_PER_WEEK: usize = 7;

/// Monday-first weekday column labels, fixed for every week row.
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// Visual state of one grid cell.
///
/// `Rest` is a real day with zero progress and renders as a visible muted
/// cell; `Empty` is a placeholder for a day beyond the cutoff and renders as a
/// blank borderless slot. The two are distinct on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    Completed,
    Failed,
    Rest,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub label: String,
    pub status: CellStatus,
    /// Always zero for `Empty` placeholders; they carry no percentage.
    pub percentage: u32,
}

impl CalendarDay {
    fn populated(record: &DayRecord, threshold: u32) -> Self {
        let status = if record.percentage >= threshold {
            CellStatus::Completed
        } else if record.percentage > 0 {
            CellStatus::Failed
        } else {
            CellStatus::Rest
        };
        Self {
            label: record.day.to_string(),
            status,
            percentage: record.percentage,
        }
    }

    fn placeholder() -> Self {
        Self {
            label: String::new(),
            status: CellStatus::Empty,
            percentage: 0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.status == CellStatus::Empty
    }
}

/// One row of the calendar grid: exactly seven day slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarWeek {
    pub index: usize,
    pub days: Vec<CalendarDay>,
}

/// Bucket records into calendar weeks up to the given cutoff day.
///
/// Records beyond the cutoff have not happened yet in the period and are
/// dropped entirely, not shown as placeholders with unknown status. Only the
/// final week is padded, so placeholders always form a contiguous tail.
pub fn bucketize(records: &[DayRecord], cutoff_day: u32, config: &EngineConfig) -> Vec<CalendarWeek> {
    let mut visible: Vec<DayRecord> = records
        .iter()
        .filter(|r| r.day <= cutoff_day)
        .copied()
        .collect();
    visible.sort_by_key(|r| r.day);

    let threshold = config.completion_threshold;
    let mut weeks = Vec::with_capacity(visible.len().div_ceil(DAYS_PER_WEEK));

    for (index, chunk) in visible.chunks(DAYS_PER_WEEK).enumerate() {
        let mut days: Vec<CalendarDay> = chunk
            .iter()
            .map(|r| CalendarDay::populated(r, threshold))
            .collect();
        while days.len() < DAYS_PER_WEEK {
            days.push(CalendarDay::placeholder());
        }
        weeks.push(CalendarWeek { index, days });
    }

    weeks
}
