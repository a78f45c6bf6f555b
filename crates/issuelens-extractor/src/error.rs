//! Error types for the Extractor

use issuelens_domain::{FailureKind, RecordValidationError};
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Completion provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Input text is empty
    #[error("Issue text is empty")]
    EmptyText,

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Extraction timeout
    #[error("Extraction timeout after {0}s")]
    Timeout(u64),

    /// Response is not a JSON object of the record shape
    #[error("Invalid record format: {0}")]
    InvalidFormat(String),

    /// Record parsed but failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] RecordValidationError),

    /// Parallelism below one
    #[error("max_parallelism must be at least 1 (got {0})")]
    InvalidParallelism(usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// Failure category for a per-issue error
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ExtractorError::Llm(_) => FailureKind::Transport,
            ExtractorError::Timeout(_) => FailureKind::Timeout,
            ExtractorError::InvalidFormat(_) | ExtractorError::Validation(_) => {
                FailureKind::SchemaValidation
            }
            ExtractorError::EmptyText
            | ExtractorError::TextTooLong(_, _)
            | ExtractorError::InvalidParallelism(_)
            | ExtractorError::Config(_) => FailureKind::InvalidInput,
        }
    }

    /// Network or service unavailability, including timeouts
    pub fn is_transport(&self) -> bool {
        matches!(self.failure_kind(), FailureKind::Transport | FailureKind::Timeout)
    }

    /// Service output did not match the record shape
    pub fn is_schema(&self) -> bool {
        self.failure_kind() == FailureKind::SchemaValidation
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::InvalidFormat(e.to_string())
    }
}
