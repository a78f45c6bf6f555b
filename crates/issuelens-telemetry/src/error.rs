//! Error types for telemetry sinks

use thiserror::Error;

/// Errors that can occur while sending telemetry
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The destination refused a request
    #[error("Rejected with HTTP {status}: {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// The sink was already closed
    #[error("Sink is closed")]
    Closed,

    /// Sink configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Event could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
