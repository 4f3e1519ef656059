pub mod calendar;
pub mod layout;
pub mod metrics;

pub use calendar::{bucketize, CalendarDay, CalendarWeek, CellStatus, DAYS_PER_WEEK, WEEKDAY_LABELS};
pub use layout::{compute_cell_size, GridGeometry, GridSizer, SizerMode};
pub use metrics::ProgressMetrics;
