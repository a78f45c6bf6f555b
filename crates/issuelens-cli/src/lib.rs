//! IssueLens CLI library.
//!
//! Argument parsing, run configuration, and the fetch-extract-emit flow
//! behind the `issuelens` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;

pub use app::{App, RunSummary};
pub use cli::Cli;
pub use config::AppConfig;
pub use error::{CliError, Result};
