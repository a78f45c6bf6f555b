//! Error types for issue retrieval

use thiserror::Error;

/// Errors that can occur while fetching issues
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Repository does not exist or is not visible with the current token
    #[error("Repository not found: {0}")]
    NotFound(String),

    /// Rate limit or abuse detection kicked in
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other non-success status
    #[error("GitHub API returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
