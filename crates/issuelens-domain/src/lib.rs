//! IssueLens Domain Layer
//!
//! Data contracts shared by every other crate in the workspace, plus the
//! trait seams behind which the external collaborators live.
//!
//! ## Key Concepts
//!
//! - **RawIssue**: Serialized text of one issue, as handed over by an issue source
//! - **Record**: The validated, structured result of extracting one issue
//! - **Failure**: A per-issue extraction failure, kept only for logging and counting
//! - **BatchResult**: Records plus failures produced by one pipeline run
//! - **Event**: A flat, multi-valued field set ready for a telemetry sink
//!
//! ## Architecture
//!
//! Infrastructure (HTTP clients, the telemetry transport, the issue tracker)
//! lives in other crates and plugs in through the traits in [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod event;
pub mod record;
pub mod sentiment;
pub mod traits;

// Re-exports for convenience
pub use batch::{BatchResult, Failure, FailureKind};
pub use event::{Event, FieldValue};
pub use record::{RawIssue, Record, RecordValidationError, MAX_SUMMARY_CHARS};
pub use sentiment::Sentiment;
