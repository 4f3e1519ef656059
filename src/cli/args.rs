use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stride", version, author, about = "A terminal dashboard for your training progress")]
pub struct Cli {
    /// Path to the exported progress document (overrides config)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Pretend today is this day of the month (1-31)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..=31))]
    pub today: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a progress summary without entering the dashboard
    Stats {
        /// Use the plan window instead of the month window
        #[arg(long)]
        plan: bool,
    },
    /// Render a snapshot image and hand it to the share target
    Share {
        /// Use the plan window instead of the month window
        #[arg(long)]
        plan: bool,
        /// Write the image to this path instead of the default location
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show where config and data files live
    Paths,
}
