use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;

use crate::capture::{share_snapshot, FileSink, ShareOutcome};
use crate::config::AppConfig;
use crate::data::ProgressExport;
use crate::engine::{bucketize, metrics};
use crate::utils::format::{format_percent, format_streak, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const TEAL: &str = "\x1b[38;2;86;182;194m";

/// Resolve the requested window against what the export actually has.
fn select_window(export: &ProgressExport, plan: bool) -> (Vec<crate::models::DayRecord>, String) {
    if plan && export.has_plan() {
        (export.plan_records(), "Current plan".to_string())
    } else {
        if plan {
            println_colored!(DIM, "  (no plan data, showing month)");
        }
        (
            export.month_records(),
            Local::now().format("%B %Y").to_string(),
        )
    }
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(
    config: &AppConfig,
    export: &ProgressExport,
    plan: bool,
    cutoff_day: u32,
) -> Result<()> {
    let (records, label) = select_window(export, plan);
    let metrics = metrics::compute(&records, &config.engine);
    let weeks = bucketize(&records, cutoff_day, &config.engine);

    println!();
    println_colored!(TEAL, "  Progress  ·  {}", label);
    println!();

    if metrics.total_days == 0 {
        println_colored!(DIM, "  No recorded days yet.");
        println!();
        return Ok(());
    }

    println_colored!(
        GREEN,
        "  {}  {}% complete",
        progress_bar(metrics.completed_days, metrics.total_days, 24),
        metrics.completion_percentage
    );
    println!();
    println_colored!(
        BOLD,
        "  Best streak:  {}",
        format_streak(metrics.longest_success_streak)
    );
    println!("  Consistency:  {}", format_percent(metrics.consistency_rate));
    println!("  Avg progress: {}", format_percent(metrics.average_progress));
    println!("  Best day:     {}%", metrics.best_day_percentage);
    println!();
    if metrics.failed_days > 0 {
        println_colored!(
            RED,
            "  Active: {}/{}  |  Done: {}  |  Failed: {}  |  Rest: {}",
            metrics.days_with_activity,
            metrics.total_days,
            metrics.completed_days,
            metrics.failed_days,
            metrics.rest_days
        );
    } else {
        println!(
            "  Active: {}/{}  |  Done: {}  |  Failed: 0  |  Rest: {}",
            metrics.days_with_activity,
            metrics.total_days,
            metrics.completed_days,
            metrics.rest_days
        );
    }
    println_colored!(DIM, "  Weeks shown through day {}: {}", cutoff_day, weeks.len());
    println!();
    Ok(())
}

// ─── Share ───────────────────────────────────────────────────────────────────

pub fn handle_share(
    config: &AppConfig,
    export: &ProgressExport,
    plan: bool,
    cutoff_day: u32,
    output: Option<PathBuf>,
) -> Result<()> {
    let (records, label) = select_window(export, plan);
    let metrics = metrics::compute(&records, &config.engine);
    let weeks = bucketize(&records, cutoff_day, &config.engine);

    let sink = FileSink::new(output);
    let outcome = share_snapshot(
        &metrics,
        &weeks,
        &label,
        &config.engine,
        &config.capture,
        &sink,
    )?;

    match outcome {
        ShareOutcome::Delivered(path) => {
            println_colored!(GREEN, "  Snapshot saved to {}", path.display());
        }
        ShareOutcome::Cancelled => {
            println_colored!(DIM, "  Share cancelled.");
        }
    }
    Ok(())
}

// ─── Paths ───────────────────────────────────────────────────────────────────

pub fn handle_paths(config: &AppConfig, export_path: &std::path::Path) -> Result<()> {
    println!();
    println!("  Config:  {}", AppConfig::config_path()?.display());
    println!("  Data:    {}", AppConfig::data_dir()?.display());
    println!("  Export:  {}", export_path.display());
    if config.data.export_path.is_some() {
        println_colored!(DIM, "  (export path pinned in config.toml)");
    }
    println!();
    Ok(())
}
