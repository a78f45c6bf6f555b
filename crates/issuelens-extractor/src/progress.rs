//! Completion counter shared between the pipeline and its observers

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Observer = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Monotonic count of resolved issues in the current run
///
/// Clones share the same counters, so a progress display can hold one while
/// the pipeline advances another.
#[derive(Clone, Default)]
pub struct Progress {
    completed: Arc<AtomicUsize>,
    total: Arc<AtomicUsize>,
    observer: Option<Observer>,
}

impl Progress {
    /// Create a counter with no observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `observer(completed, total)` after every advance
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Issues resolved so far
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Issues submitted to the current run
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub(crate) fn start(&self, total: usize) {
        self.completed.store(0, Ordering::SeqCst);
        self.total.store(total, Ordering::SeqCst);
    }

    pub(crate) fn advance(&self) -> usize {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(observer) = &self.observer {
            observer(completed, self.total());
        }
        completed
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("completed", &self.completed())
            .field("total", &self.total())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_advance_and_reset() {
        let progress = Progress::new();
        progress.start(3);
        assert_eq!(progress.advance(), 1);
        assert_eq!(progress.advance(), 2);
        assert_eq!(progress.completed(), 2);
        assert_eq!(progress.total(), 3);

        progress.start(5);
        assert_eq!(progress.completed(), 0);
        assert_eq!(progress.total(), 5);
    }

    #[test]
    fn test_clones_share_counters() {
        let progress = Progress::new();
        let view = progress.clone();
        progress.start(2);
        progress.advance();
        assert_eq!(view.completed(), 1);
    }

    #[test]
    fn test_observer_sees_every_step() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new().with_observer(move |done, total| {
            sink.lock().unwrap().push((done, total));
        });

        progress.start(2);
        progress.advance();
        progress.advance();

        assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }
}
