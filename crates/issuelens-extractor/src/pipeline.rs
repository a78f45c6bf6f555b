//! Bounded-parallel extraction over a batch of issues
//!
//! A fixed pool of workers pulls issue texts from a shared queue and pushes
//! every outcome through one channel to a single aggregator, which is the
//! only writer of the batch result and the progress counter.

use crate::error::ExtractorError;
use crate::extractor::Extractor;
use crate::parser::issue_id_hint;
use crate::progress::Progress;
use issuelens_domain::traits::CompletionProvider;
use issuelens_domain::{BatchResult, Failure, FailureKind, Record};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

type Outcome = Result<Record, Failure>;

/// Drives the Extractor across a whole batch
///
/// Per-issue failures never fail the run; they are counted in the returned
/// [`BatchResult`] and logged.
pub struct PipelineCoordinator<P>
where
    P: CompletionProvider + 'static,
{
    extractor: Arc<Extractor<P>>,
    progress: Progress,
    cancel: CancellationToken,
}

impl<P> PipelineCoordinator<P>
where
    P: CompletionProvider + 'static,
{
    /// Create a coordinator around an extractor
    pub fn new(extractor: Extractor<P>) -> Self {
        Self {
            extractor: Arc::new(extractor),
            progress: Progress::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally observed progress counter
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Progress of the current or last run
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Token that stops workers from picking up further issues
    ///
    /// Calls already in flight finish normally and their results are kept.
    /// Cancellation is permanent: once the token fires, every later `run` on
    /// this coordinator counts its whole batch as skipped.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Extract every issue in `raw_texts` with at most `max_parallelism`
    /// calls in flight
    ///
    /// Returns once every issue has resolved to a record or a failure (or,
    /// after cancellation, has been counted as skipped). A worker that panics
    /// is logged, and the issues it leaves behind become aborted failures.
    /// Output order is completion order.
    ///
    /// # Errors
    ///
    /// Only [`ExtractorError::InvalidParallelism`] when `max_parallelism` is 0.
    pub async fn run(
        &self,
        raw_texts: Vec<String>,
        max_parallelism: usize,
    ) -> Result<BatchResult, ExtractorError> {
        if max_parallelism == 0 {
            return Err(ExtractorError::InvalidParallelism(max_parallelism));
        }

        let total = raw_texts.len();
        self.progress.start(total);
        if total == 0 {
            info!("No issues to extract");
            return Ok(BatchResult::new());
        }

        let workers = max_parallelism.min(total);
        info!("Extracting {} issues with {} workers", total, workers);

        let (work_tx, work_rx) = mpsc::channel::<String>(total);
        for text in raw_texts {
            // Capacity equals the batch size, so this cannot fill up
            if work_tx.try_send(text).is_err() {
                return Err(ExtractorError::Config("work queue rejected an issue".to_string()));
            }
        }
        drop(work_tx);
        let queue = Arc::new(Mutex::new(work_rx));

        let (result_tx, mut result_rx) = mpsc::channel::<Outcome>(workers);
        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            let queue = Arc::clone(&queue);
            let results = result_tx.clone();
            let extractor = Arc::clone(&self.extractor);
            let cancel = self.cancel.clone();

            pool.spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        debug!("Worker {} stopping on cancellation", worker_id);
                        break;
                    }
                    let next = queue.lock().await.recv().await;
                    let Some(text) = next else { break };

                    let outcome = extractor.extract(&text).await;
                    if results.send(outcome).await.is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let mut batch = BatchResult::new();
        let mut seen_ids = HashSet::new();
        while let Some(outcome) = result_rx.recv().await {
            match outcome {
                Ok(record) if !seen_ids.insert(record.id) => {
                    let failure = Failure::new(
                        Some(record.id),
                        FailureKind::SchemaValidation,
                        format!("duplicate issue id {} in batch", record.id),
                    );
                    warn!("Extraction failed for {}", failure);
                    batch.push_failure(failure);
                }
                Ok(record) => {
                    debug!("Extracted issue {}", record.id);
                    batch.push_record(record);
                }
                Err(failure) => {
                    warn!("Extraction failed for {}", failure);
                    batch.push_failure(failure);
                }
            }
            self.progress.advance();
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                error!("Extraction worker stopped abnormally: {}", e);
            }
        }

        // Issues left on the queue were either never started because of
        // cancellation, or stranded because every worker crashed
        let cancelled = self.cancel.is_cancelled();
        let mut queue = queue.lock().await;
        while let Ok(text) = queue.try_recv() {
            if cancelled {
                batch.skipped += 1;
            } else {
                batch.push_failure(Failure::new(
                    issue_id_hint(&text),
                    FailureKind::Aborted,
                    "no worker left to extract issue",
                ));
                self.progress.advance();
            }
        }

        // Issues a crashed worker took off the queue but never reported
        let lost = total - batch.resolved() - batch.skipped;
        for _ in 0..lost {
            batch.push_failure(Failure::new(
                None,
                FailureKind::Aborted,
                "worker stopped before resolving issue",
            ));
            self.progress.advance();
        }

        if batch.skipped > 0 {
            warn!("Run cancelled; {} issues were not started", batch.skipped);
        }
        info!(
            "Extraction complete: {} succeeded, {} failed",
            batch.records.len(),
            batch.failure_count()
        );

        Ok(batch)
    }
}
