//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::parser::{issue_id_hint, parse_record};
use crate::prompt::build_request;
use issuelens_domain::traits::{CompletionError, CompletionProvider};
use issuelens_domain::{Failure, Record};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::debug;

/// The Extractor turns one issue's raw text into a validated record
///
/// Holds no per-call state; a single instance is shared by every worker.
pub struct Extractor<P>
where
    P: CompletionProvider,
{
    provider: Arc<P>,
    config: ExtractorConfig,
}

impl<P> Extractor<P>
where
    P: CompletionProvider,
{
    /// Create a new Extractor
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self::from_shared(Arc::new(provider), config)
    }

    /// Create an Extractor around a provider that is shared elsewhere
    pub fn from_shared(provider: Arc<P>, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract a record from one issue
    ///
    /// Makes at most one provider call. Any error is turned into a
    /// [`Failure`] tagged with the issue number when it can be read from
    /// the input.
    pub async fn extract(&self, raw_text: &str) -> Result<Record, Failure> {
        self.try_extract(raw_text).await.map_err(|e| {
            Failure::new(issue_id_hint(raw_text), e.failure_kind(), e.to_string())
        })
    }

    /// Extract a record, keeping the typed error
    pub async fn try_extract(&self, raw_text: &str) -> Result<Record, ExtractorError> {
        if raw_text.trim().is_empty() {
            return Err(ExtractorError::EmptyText);
        }

        let text_chars = raw_text.chars().count();
        if text_chars > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                text_chars,
                self.config.max_text_length,
            ));
        }

        let request = build_request(raw_text);

        let response = timeout(
            self.config.extraction_timeout(),
            self.provider.complete_structured(&request),
        )
        .await
        .map_err(|_| ExtractorError::Timeout(self.config.extraction_timeout_secs))?
        .map_err(|e| {
            if e.is_malformed_output() {
                ExtractorError::InvalidFormat(e.to_string())
            } else {
                ExtractorError::Llm(e.to_string())
            }
        })?;

        debug!("LLM response length: {} chars", response.len());

        parse_record(&response)
    }
}
