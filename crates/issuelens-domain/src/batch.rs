//! Batch module - what one pipeline run hands back to its caller

use crate::record::Record;
use std::fmt;

/// Category of a per-issue failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Network or completion service unavailable
    Transport,

    /// The per-call timeout elapsed
    Timeout,

    /// Service output did not match the record shape
    SchemaValidation,

    /// Input text rejected before any call was made
    InvalidInput,

    /// The worker handling the issue stopped before resolving it
    Aborted,
}

impl FailureKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Timeout => "timeout",
            FailureKind::SchemaValidation => "schema_validation",
            FailureKind::InvalidInput => "invalid_input",
            FailureKind::Aborted => "aborted",
        }
    }
}

/// One issue that did not produce a record
///
/// Only used for logging and counting; failures are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Issue identifier, when it could be read from the input
    pub issue_id: Option<u64>,

    /// Failure category
    pub kind: FailureKind,

    /// Underlying error message
    pub message: String,
}

impl Failure {
    /// Create a new failure
    pub fn new(issue_id: Option<u64>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            issue_id,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue_id {
            Some(id) => write!(f, "issue {} ({}): {}", id, self.kind.as_str(), self.message),
            None => write!(f, "issue ? ({}): {}", self.kind.as_str(), self.message),
        }
    }
}

/// Outcome of one pipeline run
///
/// Records are in completion order, which is unrelated to input order.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    /// Successfully extracted records
    pub records: Vec<Record>,

    /// Failures, kept for observability
    pub failures: Vec<Failure>,

    /// Issues never started because the run was cancelled
    pub skipped: usize,
}

impl BatchResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a success
    pub fn push_record(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Record a failure
    pub fn push_failure(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    /// Number of failed issues
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of issues resolved either way
    pub fn resolved(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    /// Whether nothing was produced at all
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.failures.is_empty()
    }
}
