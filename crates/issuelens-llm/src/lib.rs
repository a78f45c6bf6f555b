//! IssueLens LLM Provider Layer
//!
//! Implementations of the `CompletionProvider` trait from `issuelens-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI chat completions with JSON-schema output
//!
//! # Examples
//!
//! ```
//! use issuelens_llm::MockProvider;
//! use issuelens_domain::traits::{CompletionProvider, CompletionRequest};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let provider = MockProvider::new("{}");
//! let request = CompletionRequest {
//!     system: "parse".to_string(),
//!     user: "issue text".to_string(),
//!     schema_name: "record".to_string(),
//!     schema: serde_json::json!({}),
//! };
//! assert_eq!(provider.complete_structured(&request).await.unwrap(), "{}");
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use async_trait::async_trait;
use issuelens_domain::traits::{CompletionError, CompletionProvider, CompletionRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The model declined to answer
    #[error("Refused: {0}")]
    Refused(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CompletionError for LlmError {
    fn is_malformed_output(&self) -> bool {
        matches!(self, LlmError::InvalidResponse(_) | LlmError::Refused(_))
    }
}

/// Canned behaviour for one user message
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail(String),
}

/// Mock completion provider for deterministic testing
///
/// Returns pre-configured responses keyed by the request's user message,
/// without making any network calls. Clones share state.
///
/// # Examples
///
/// ```
/// use issuelens_llm::MockProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("issue 1", r#"{"id": 1}"#);
/// provider.add_error("issue 2", "connection reset");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    call_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    /// Sleep for `delay` inside every call, to simulate network latency
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific response for a given user message
    pub fn add_response(&mut self, user: impl Into<String>, response: impl Into<String>) {
        self.replies().insert(user.into(), MockReply::Text(response.into()));
    }

    /// Configure a communication error for a given user message
    pub fn add_error(&mut self, user: impl Into<String>, message: impl Into<String>) {
        self.replies().insert(user.into(), MockReply::Fail(message.into()));
    }

    /// Get the number of completed or running calls
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    /// Highest number of calls that were running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn replies(&self) -> MutexGuard<'_, HashMap<String, MockReply>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    type Error = LlmError;

    async fn complete_structured(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        let reply = self.replies().get(&request.user).cloned();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail(message)) => Err(LlmError::Communication(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}
