//! Run configuration assembled from the environment, flags and an optional
//! TOML file.
//!
//! Precedence, highest first: command-line flag, environment variable,
//! config file, built-in default.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use issuelens_extractor::ExtractorConfig;
use issuelens_telemetry::HoneycombConfig;
use std::fs;

/// OpenAI API key
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// OpenAI-compatible base URL
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
/// Model override
pub const ENV_MODEL: &str = "ISSUELENS_MODEL";
/// GitHub token (optional)
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
/// Honeycomb write key
pub const ENV_HONEYCOMB_API_KEY: &str = "HONEYCOMB_API_KEY";
/// Honeycomb dataset override
pub const ENV_HONEYCOMB_DATASET: &str = "HONEYCOMB_DATASET";
/// Honeycomb API host override
pub const ENV_HONEYCOMB_ENDPOINT: &str = "HONEYCOMB_ENDPOINT";

/// Everything a run needs, validated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// OpenAI API key
    pub openai_api_key: String,

    /// OpenAI base URL, when overridden
    pub openai_base_url: Option<String>,

    /// GitHub token, when set
    pub github_token: Option<String>,

    /// Extractor settings
    pub extractor: ExtractorConfig,

    /// Telemetry destination; `None` in dry-run mode
    pub honeycomb: Option<HoneycombConfig>,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env(cli: &Cli) -> Result<Self> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn resolve<F>(cli: &Cli, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let mut extractor = match &cli.config {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|e| {
                    CliError::Config(format!("Cannot read {}: {}", path.display(), e))
                })?;
                ExtractorConfig::from_toml(&contents)
                    .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?
            }
            None => ExtractorConfig::default(),
        };
        if let Some(model) = var(ENV_MODEL) {
            extractor.model = model;
        }
        if let Some(parallelism) = cli.parallelism {
            extractor.max_parallelism = parallelism;
        }
        extractor
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let openai_api_key = var(ENV_OPENAI_API_KEY)
            .ok_or_else(|| CliError::Config(format!("{} is not set", ENV_OPENAI_API_KEY)))?;

        let honeycomb = if cli.dry_run {
            None
        } else {
            let write_key = var(ENV_HONEYCOMB_API_KEY).ok_or_else(|| {
                CliError::Config(format!(
                    "{} is not set (use --dry-run to skip telemetry)",
                    ENV_HONEYCOMB_API_KEY
                ))
            })?;
            let mut honeycomb = HoneycombConfig::new(write_key);
            if let Some(dataset) = var(ENV_HONEYCOMB_DATASET) {
                honeycomb = honeycomb.with_dataset(dataset);
            }
            if let Some(endpoint) = var(ENV_HONEYCOMB_ENDPOINT) {
                honeycomb = honeycomb.with_endpoint(endpoint);
            }
            honeycomb
                .validate()
                .map_err(|e| CliError::Config(e.to_string()))?;
            Some(honeycomb)
        };

        Ok(Self {
            openai_api_key,
            openai_base_url: var(ENV_OPENAI_BASE_URL),
            github_token: var(ENV_GITHUB_TOKEN),
            extractor,
            honeycomb,
        })
    }

    /// Whether telemetry is skipped in favour of a printed report.
    pub fn is_dry_run(&self) -> bool {
        self.honeycomb.is_none()
    }
}
