//! Honeycomb sink
//!
//! Buffers events and ships them through the batch events API. The buffer is
//! flushed whenever it reaches `batch_size` and once more on `close`, so no
//! event is left behind at shutdown.
//!
//! # Examples
//!
//! ```no_run
//! use issuelens_telemetry::{HoneycombConfig, HoneycombSink};
//!
//! let config = HoneycombConfig::new("write-key");
//! let sink = HoneycombSink::new(config).unwrap();
//! ```

use crate::error::TelemetryError;
use async_trait::async_trait;
use issuelens_domain::traits::{DeliveryStats, TelemetrySink};
use issuelens_domain::Event;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Honeycomb API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.honeycomb.io";

/// Default dataset for issue events
pub const DEFAULT_DATASET: &str = "otel-github-issues";

/// Default number of events per batch request
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Default HTTP timeout for batch requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Routing and authentication for the Honeycomb sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoneycombConfig {
    /// Team write key
    pub write_key: String,

    /// Destination dataset
    pub dataset: String,

    /// API host, with or without scheme
    pub endpoint: String,

    /// Events per batch request
    pub batch_size: usize,
}

impl HoneycombConfig {
    /// Configuration with the default dataset and endpoint
    pub fn new(write_key: impl Into<String>) -> Self {
        Self {
            write_key: write_key.into(),
            dataset: DEFAULT_DATASET.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the dataset
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    /// Override the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Full URL of the batch endpoint for the configured dataset
    pub fn batch_url(&self) -> Result<Url, TelemetryError> {
        let endpoint = if self.endpoint.contains("://") {
            self.endpoint.clone()
        } else {
            format!("https://{}", self.endpoint)
        };

        let mut url = Url::parse(&endpoint)
            .map_err(|e| TelemetryError::Config(format!("Invalid endpoint '{}': {}", self.endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| TelemetryError::Config(format!("Endpoint '{}' cannot be a base", self.endpoint)))?
            .pop_if_empty()
            .extend(["1", "batch", self.dataset.as_str()]);
        Ok(url)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), TelemetryError> {
        if self.write_key.trim().is_empty() {
            return Err(TelemetryError::Config("write key is empty".to_string()));
        }
        if self.dataset.trim().is_empty() {
            return Err(TelemetryError::Config("dataset is empty".to_string()));
        }
        if self.batch_size == 0 {
            return Err(TelemetryError::Config("batch_size must be greater than 0".to_string()));
        }
        self.batch_url().map(|_| ())
    }
}

#[derive(Serialize)]
struct BatchEvent<'a> {
    data: &'a Event,
}

#[derive(Deserialize)]
struct BatchStatus {
    status: u16,
    #[serde(default)]
    error: Option<String>,
}

/// Telemetry sink backed by the Honeycomb batch API
pub struct HoneycombSink {
    client: reqwest::Client,
    write_key: String,
    url: Url,
    batch_size: usize,
    buffer: tokio::sync::Mutex<Vec<Event>>,
    stats: Mutex<DeliveryStats>,
    closed: AtomicBool,
}

impl HoneycombSink {
    /// Create a sink from a validated configuration
    pub fn new(config: HoneycombConfig) -> Result<Self, TelemetryError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TelemetryError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.batch_url()?,
            write_key: config.write_key,
            batch_size: config.batch_size,
            buffer: tokio::sync::Mutex::new(Vec::new()),
            stats: Mutex::new(DeliveryStats::default()),
            closed: AtomicBool::new(false),
        })
    }

    /// Delivery totals so far
    pub fn stats(&self) -> DeliveryStats {
        *self.counters()
    }

    fn counters(&self) -> MutexGuard<'_, DeliveryStats> {
        self.stats
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ship one batch and record per-event outcomes
    async fn flush(&self, batch: Vec<Event>) {
        if batch.is_empty() {
            return;
        }

        let count = batch.len();
        match self.post(&batch).await {
            Ok(statuses) => {
                let delivered = statuses
                    .iter()
                    .filter(|s| (200..300).contains(&s.status))
                    .count()
                    .min(count);
                for status in statuses.iter().filter(|s| !(200..300).contains(&s.status)) {
                    warn!(
                        "Honeycomb rejected event with {}: {}",
                        status.status,
                        status.error.as_deref().unwrap_or("no reason given")
                    );
                }
                let mut stats = self.counters();
                stats.delivered += delivered;
                stats.failed += count - delivered;
                debug!("Flushed {} events ({} delivered)", count, delivered);
            }
            Err(e) => {
                warn!("Failed to send batch of {} events: {}", count, e);
                self.counters().failed += count;
            }
        }
    }

    async fn post(&self, batch: &[Event]) -> Result<Vec<BatchStatus>, TelemetryError> {
        let body: Vec<BatchEvent<'_>> = batch.iter().map(|data| BatchEvent { data }).collect();

        let response = self
            .client
            .post(self.url.clone())
            .header("X-Honeycomb-Team", &self.write_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TelemetryError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TelemetryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<BatchStatus>>()
            .await
            .map_err(|e| TelemetryError::Communication(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl TelemetrySink for HoneycombSink {
    type Error = TelemetryError;

    async fn send(&self, event: Event) -> Result<(), TelemetryError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TelemetryError::Closed);
        }

        let full = {
            let mut buffer = self.buffer.lock().await;
            buffer.push(event);
            if buffer.len() >= self.batch_size {
                Some(std::mem::take(&mut *buffer))
            } else {
                None
            }
        };

        if let Some(batch) = full {
            self.flush(batch).await;
        }
        Ok(())
    }

    async fn close(&self) -> Result<DeliveryStats, TelemetryError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(TelemetryError::Closed);
        }

        let remaining = std::mem::take(&mut *self.buffer.lock().await);
        self.flush(remaining).await;
        Ok(self.stats())
    }
}
