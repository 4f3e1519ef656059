use serde::{Deserialize, Serialize};

/// Outcome recorded for one calendar day by the upstream aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Success,
    Fail,
    Rest,
}

/// One calendar day's training completion, as exported by the backend.
///
/// Records are produced externally and consumed read-only. `percentage` is
/// expected in 0..=100; out-of-range values are a caller contract violation
/// and are not clamped here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// Day of the period, 1-based (1..=31).
    pub day: u32,
    pub percentage: u32,
    pub status: DayStatus,
}

impl DayRecord {
    pub fn new(day: u32, percentage: u32, status: DayStatus) -> Self {
        Self {
            day,
            percentage,
            status,
        }
    }

    /// A day counts as active when any progress was logged at all.
    pub fn is_active(&self) -> bool {
        self.percentage > 0
    }
}
