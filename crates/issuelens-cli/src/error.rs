//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Missing or invalid configuration, reported before any work starts
    #[error("Configuration error: {0}")]
    Config(String),

    /// Issue retrieval failed
    #[error("Failed to fetch issues: {0}")]
    Fetch(String),

    /// Completion provider setup error
    #[error("LLM error: {0}")]
    Llm(#[from] issuelens_llm::LlmError),

    /// Extraction pipeline error
    #[error("Extraction error: {0}")]
    Extractor(#[from] issuelens_extractor::ExtractorError),

    /// Telemetry sink setup error
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] issuelens_telemetry::TelemetryError),

    /// GitHub client setup error
    #[error("GitHub error: {0}")]
    GitHub(#[from] issuelens_github::GitHubError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
