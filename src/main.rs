mod capture;
mod cli;
mod config;
mod data;
mod engine;
mod models;
mod tui;
mod utils;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use std::path::PathBuf;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use data::ProgressExport;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;

    // First run: materialize the default config so the tunables are
    // discoverable, and make sure the data directory exists.
    if !AppConfig::config_path()?.exists() {
        config.save().context("Writing default config")?;
    }
    AppConfig::ensure_data_dir()?;

    // --data wins over config.toml, which wins over the default location.
    let export_path: PathBuf = match (&cli.data, &config.data.export_path) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => path.clone(),
        (None, None) => AppConfig::default_export_path()?,
    };

    // A missing export is a fresh install, not an error.
    let export = if export_path.exists() {
        ProgressExport::load(&export_path)?
    } else {
        log::info!("no progress export at {:?}, starting empty", export_path);
        ProgressExport::default()
    };

    let cutoff_day = cli.today.unwrap_or_else(|| Local::now().day());

    match cli.command {
        Some(Commands::Stats { plan }) => handlers::handle_stats(&config, &export, plan, cutoff_day),
        Some(Commands::Share { plan, output }) => {
            handlers::handle_share(&config, &export, plan, cutoff_day, output)
        }
        Some(Commands::Paths) => handlers::handle_paths(&config, &export_path),
        None => tui::app::run(config, export, cutoff_day),
    }
}
