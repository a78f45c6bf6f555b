//! IssueLens Extractor
//!
//! Turns raw issue text into structured records using a language model, and
//! runs that extraction across whole batches with bounded parallelism.
//!
//! # Architecture
//!
//! ```text
//! raw issue texts → PipelineCoordinator → Extractor (N workers) → LLM
//!                          ↓
//!                     BatchResult (records + failures)
//! ```
//!
//! # Key Features
//!
//! - **Single-call extraction**: one structured completion per issue, no retries
//! - **Validation**: every record is checked before it leaves the extractor
//! - **Failure isolation**: a failing issue is counted and logged, never fatal
//! - **Progress**: a shared completion counter for progress displays
//! - **Cancellation**: stop picking up new issues, keep finished records
//!
//! # Example Usage
//!
//! ```no_run
//! use issuelens_extractor::{Extractor, ExtractorConfig, PipelineCoordinator};
//! use issuelens_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractorConfig::default();
//! let parallelism = config.max_parallelism;
//! let extractor = Extractor::new(MockProvider::new("{}"), config);
//! let coordinator = PipelineCoordinator::new(extractor);
//!
//! let batch = coordinator
//!     .run(vec!["{\"number\": 1, \"title\": \"Crash\"}".to_string()], parallelism)
//!     .await?;
//!
//! println!("Records: {}", batch.records.len());
//! println!("Failures: {}", batch.failure_count());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod pipeline;
mod progress;
mod prompt;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::{issue_id_hint, parse_record};
pub use pipeline::PipelineCoordinator;
pub use progress::Progress;
pub use prompt::{build_request, record_schema, SCHEMA_NAME, SYSTEM_INSTRUCTION};
