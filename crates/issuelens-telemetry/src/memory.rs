//! In-memory sink for tests and local inspection

use crate::error::TelemetryError;
use async_trait::async_trait;
use issuelens_domain::traits::{DeliveryStats, TelemetrySink};
use issuelens_domain::Event;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Sink that keeps every accepted event in memory
///
/// Deterministic: events are stored in send order. Selected sends can be
/// made to fail by their zero-based position. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<Event>>>,
    sends: Arc<AtomicUsize>,
    fail_on: Arc<HashSet<usize>>,
    closed: Arc<AtomicBool>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the sends at the given positions
    pub fn fail_on(mut self, positions: &[usize]) -> Self {
        self.fail_on = Arc::new(positions.iter().copied().collect());
        self
    }

    /// Snapshot of the accepted events
    pub fn events(&self) -> Vec<Event> {
        self.stored().clone()
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn stored(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TelemetrySink for MemorySink {
    type Error = TelemetryError;

    async fn send(&self, event: Event) -> Result<(), TelemetryError> {
        if self.is_closed() {
            return Err(TelemetryError::Closed);
        }

        let position = self.sends.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(&position) {
            return Err(TelemetryError::Communication(format!(
                "simulated failure for send {}",
                position
            )));
        }

        self.stored().push(event);
        Ok(())
    }

    async fn close(&self) -> Result<DeliveryStats, TelemetryError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(TelemetryError::Closed);
        }
        Ok(DeliveryStats {
            delivered: self.stored().len(),
            failed: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stores_in_order() {
        let sink = MemorySink::new();
        for i in 0..3u64 {
            let mut event = Event::new();
            event.add_field("id", i);
            sink.send(event).await.unwrap();
        }

        let ids: Vec<String> = sink
            .events()
            .iter()
            .map(|e| e.first("id").unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[tokio::test]
    async fn test_close_twice() {
        let sink = MemorySink::new();
        assert_eq!(sink.close().await.unwrap(), DeliveryStats::default());
        assert!(matches!(sink.close().await, Err(TelemetryError::Closed)));
        assert!(matches!(sink.send(Event::new()).await, Err(TelemetryError::Closed)));
    }
}
