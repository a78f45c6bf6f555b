//! IssueLens Telemetry
//!
//! Turns extracted records into flat events and hands them to a sink.
//!
//! ## Sinks
//!
//! - [`HoneycombSink`]: batches events to the Honeycomb batch API
//! - [`MemorySink`]: keeps events in memory, for tests
//!
//! In dry-run mode nothing is emitted; [`DryRunReporter`] prints a summary
//! instead.
//!
//! ## Delivery
//!
//! Emission is best-effort. A failed send is logged and counted, and the
//! remaining events are still sent. Buffered events are flushed when the sink
//! is closed, and the sink reports how many were actually delivered.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod dry_run;
mod emitter;
mod error;
mod flatten;
pub mod honeycomb;
mod memory;

pub use dry_run::DryRunReporter;
pub use emitter::{emit, emit_and_close, EmitReport};
pub use error::TelemetryError;
pub use flatten::flatten;
pub use honeycomb::{HoneycombConfig, HoneycombSink};
pub use memory::MemorySink;
