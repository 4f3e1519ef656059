pub mod record;

pub use record::{DayRecord, DayStatus};
