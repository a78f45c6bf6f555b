//! Command-line argument parsing.

use clap::builder::FalseyValueParser;
use clap::Parser;
use std::path::PathBuf;

/// IssueLens - extract structured records from open GitHub issues and send
/// them as telemetry events.
#[derive(Debug, Parser)]
#[command(name = "issuelens")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// TOML file with extractor settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum extraction calls in flight
    #[arg(short = 'j', long, env = "ISSUELENS_PARALLELISM")]
    pub parallelism: Option<usize>,

    /// Print a report instead of sending telemetry
    ///
    /// Any value of DRY_RUN other than a false-like one (false, no, off, 0)
    /// turns this on.
    #[arg(long, env = "DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,
}

/// Held by tests that parse arguments while the process environment may
/// carry DRY_RUN
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
