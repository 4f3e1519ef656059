use crate::config::EngineConfig;
use crate::models::{DayRecord, DayStatus};

/// Aggregate statistics derived from one window of day records.
///
/// Recomputed whenever the source window or filter changes; never mutated in
/// place.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressMetrics {
    pub total_days: u32,
    pub days_with_activity: u32,
    pub completed_days: u32,
    pub failed_days: u32,
    pub rest_days: u32,
    pub completion_percentage: u32,
    pub average_progress: f64,
    pub consistency_rate: f64,
    pub best_day_percentage: u32,
    pub longest_success_streak: u32,
}

/// Derive metrics from a record window. Accepts records in any order.
///
/// Empty input yields the all-zero metrics rather than an error, and every
/// ratio is guarded so no division can produce NaN or infinity.
pub fn compute(records: &[DayRecord], config: &EngineConfig) -> ProgressMetrics {
    if records.is_empty() {
        return ProgressMetrics::default();
    }

    let mut sorted: Vec<DayRecord> = records.to_vec();
    sorted.sort_by_key(|r| r.day);

    let threshold = config.completion_threshold;
    let total_days = sorted.len() as u32;
    let days_with_activity = sorted.iter().filter(|r| r.is_active()).count() as u32;
    let completed_days = sorted.iter().filter(|r| r.percentage >= threshold).count() as u32;
    let failed_days = sorted
        .iter()
        .filter(|r| r.is_active() && r.percentage < threshold)
        .count() as u32;
    let rest_days = total_days - days_with_activity;

    let sum: u64 = sorted.iter().map(|r| r.percentage as u64).sum();
    let average_progress = sum as f64 / total_days as f64;

    let consistency_rate = if days_with_activity > 0 {
        completed_days as f64 / days_with_activity as f64 * 100.0
    } else {
        0.0
    };

    let best_day_percentage = sorted.iter().map(|r| r.percentage).max().unwrap_or(0);

    let completion_percentage =
        (completed_days as f64 / total_days as f64 * 100.0).round() as u32;

    ProgressMetrics {
        total_days,
        days_with_activity,
        completed_days,
        failed_days,
        rest_days,
        completion_percentage,
        average_progress,
        consistency_rate,
        best_day_percentage,
        longest_success_streak: longest_success_streak(&sorted, threshold),
    }
}

/// Longest run of consecutive completed days.
///
/// The reset rule is asymmetric on purpose: a day with partial progress or an
/// explicit fail breaks the run, but a rest day (zero progress, rest status)
/// is a neutral gap and leaves the run intact.
fn longest_success_streak(sorted: &[DayRecord], threshold: u32) -> u32 {
    let mut best = 0u32;
    let mut run = 0u32;

    for record in sorted {
        if record.percentage >= threshold {
            run += 1;
            best = best.max(run);
        } else if record.percentage > 0 || record.status == DayStatus::Fail {
            run = 0;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DayStatus::{Fail, Rest, Success};

    fn rec(day: u32, percentage: u32, status: crate::models::DayStatus) -> DayRecord {
        DayRecord::new(day, percentage, status)
    }

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn empty_input_is_all_zero() {
        let m = compute(&[], &config());
        assert_eq!(m, ProgressMetrics::default());
    }

    #[test]
    fn worked_five_day_example() {
        let records = [
            rec(1, 100, Success),
            rec(2, 50, Fail),
            rec(3, 0, Rest),
            rec(4, 90, Success),
            rec(5, 85, Success),
        ];
        let m = compute(&records, &config());

        assert_eq!(m.total_days, 5);
        assert_eq!(m.days_with_activity, 4);
        assert_eq!(m.completed_days, 3);
        assert_eq!(m.failed_days, 1);
        assert_eq!(m.rest_days, 1);
        assert_eq!(m.average_progress, 65.0);
        assert_eq!(m.consistency_rate, 75.0);
        assert_eq!(m.best_day_percentage, 100);
        // Day 2's fail resets before day 1 can chain; days 4-5 make the run.
        assert_eq!(m.longest_success_streak, 2);
        assert_eq!(m.completion_percentage, 60);
    }

    #[test]
    fn rest_days_do_not_break_a_streak() {
        let records = [
            rec(1, 95, Success),
            rec(2, 0, Rest),
            rec(3, 88, Success),
            rec(4, 81, Success),
        ];
        let m = compute(&records, &config());
        assert_eq!(m.longest_success_streak, 3);
    }

    #[test]
    fn failed_zero_percentage_day_breaks_a_streak() {
        // A fail with zero progress still resets; only rest is neutral.
        let records = [
            rec(1, 95, Success),
            rec(2, 0, Fail),
            rec(3, 88, Success),
        ];
        let m = compute(&records, &config());
        assert_eq!(m.longest_success_streak, 1);
    }

    #[test]
    fn input_order_does_not_matter() {
        let sorted = [rec(1, 90, Success), rec(2, 30, Fail), rec(3, 85, Success)];
        let shuffled = [rec(3, 85, Success), rec(1, 90, Success), rec(2, 30, Fail)];
        assert_eq!(compute(&sorted, &config()), compute(&shuffled, &config()));
    }

    #[test]
    fn consistency_is_zero_without_activity() {
        let records = [rec(1, 0, Rest), rec(2, 0, Rest)];
        let m = compute(&records, &config());
        assert_eq!(m.consistency_rate, 0.0);
        assert!(m.consistency_rate.is_finite());
    }

    #[test]
    fn completion_percentage_stays_in_range() {
        let all_done: Vec<DayRecord> = (1..=31).map(|d| rec(d, 100, Success)).collect();
        let none_done: Vec<DayRecord> = (1..=31).map(|d| rec(d, 0, Rest)).collect();
        assert_eq!(compute(&all_done, &config()).completion_percentage, 100);
        assert_eq!(compute(&none_done, &config()).completion_percentage, 0);
    }

    #[test]
    fn appending_successes_never_shrinks_the_streak() {
        let mut records = vec![
            rec(1, 90, Success),
            rec(2, 20, Fail),
            rec(3, 85, Success),
            rec(4, 85, Success),
        ];
        let before = compute(&records, &config()).longest_success_streak;
        records.push(rec(5, 80, Success));
        records.push(rec(6, 99, Success));
        let after = compute(&records, &config()).longest_success_streak;
        assert!(after >= before);
        assert_eq!(after, 4);
    }

    #[test]
    fn threshold_is_taken_from_config() {
        let records = [rec(1, 70, Success), rec(2, 70, Success)];
        let mut relaxed = config();
        relaxed.completion_threshold = 60;
        assert_eq!(compute(&records, &config()).completed_days, 0);
        assert_eq!(compute(&records, &relaxed).completed_days, 2);
    }
}
