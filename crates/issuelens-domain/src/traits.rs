//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and the services it
//! talks to. Implementations live in other crates and are passed in explicitly,
//! so tests can substitute fakes.

use crate::event::Event;
use crate::record::RawIssue;
use async_trait::async_trait;

/// A structured completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,

    /// User message (the raw issue text)
    pub user: String,

    /// Name of the output schema
    pub schema_name: String,

    /// JSON schema the output must conform to
    pub schema: serde_json::Value,
}

/// Errors raised by a completion provider
pub trait CompletionError: std::fmt::Display + Send {
    /// The service answered, but with nothing usable as structured output
    ///
    /// Such errors are classified like a response that fails the record
    /// schema, not like an outage.
    fn is_malformed_output(&self) -> bool {
        false
    }
}

/// Trait for completion services that produce schema-shaped JSON
///
/// Implemented by the infrastructure layer (issuelens-llm)
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Error type for completion calls
    type Error: CompletionError;

    /// Issue one structured completion and return the raw JSON text
    async fn complete_structured(&self, request: &CompletionRequest) -> Result<String, Self::Error>;
}

/// Delivery counters reported by a sink when it shuts down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// Events the destination acknowledged
    pub delivered: usize,

    /// Events the destination rejected or never received
    pub failed: usize,
}

/// Trait for telemetry destinations
///
/// Implemented by the infrastructure layer (issuelens-telemetry)
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Error type for sink operations
    type Error: std::fmt::Display + Send;

    /// Hand one event to the sink
    ///
    /// A sink may buffer; `Ok` means the event was accepted, not delivered.
    async fn send(&self, event: Event) -> Result<(), Self::Error>;

    /// Flush anything buffered and report delivery totals
    async fn close(&self) -> Result<DeliveryStats, Self::Error>;
}

/// Trait for issue trackers
///
/// Implemented by the infrastructure layer (issuelens-github)
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Error type for retrieval
    type Error: std::fmt::Display + Send;

    /// Fetch open issues for `owner/repo`, already filtered and serialized
    async fn open_issues(&self, owner: &str, repo: &str) -> Result<Vec<RawIssue>, Self::Error>;
}
