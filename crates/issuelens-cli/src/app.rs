//! One run: fetch, extract, then report or emit.

use crate::error::{CliError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use issuelens_domain::traits::{CompletionProvider, IssueSource, TelemetrySink};
use issuelens_domain::{BatchResult, RawIssue};
use issuelens_extractor::{Extractor, PipelineCoordinator, Progress};
use issuelens_telemetry::{emit_and_close, DryRunReporter, EmitReport};
use std::fmt;
use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::info;

const BAR_TEMPLATE: &str = "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} issues";

/// Counts printed at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Issues handed to extraction
    pub total: usize,
    /// Records produced
    pub succeeded: usize,
    /// Issues that failed extraction
    pub failed: usize,
    /// Issues never started because the run was cancelled
    pub skipped: usize,
    /// Telemetry totals, absent in dry-run mode
    pub telemetry: Option<EmitReport>,
}

impl RunSummary {
    fn from_batch(batch: &BatchResult) -> Self {
        Self {
            total: batch.records.len() + batch.failure_count() + batch.skipped,
            succeeded: batch.records.len(),
            failed: batch.failure_count(),
            skipped: batch.skipped,
            telemetry: None,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed: {} | Succeeded: {} | Failed: {}",
            self.total, self.succeeded, self.failed
        )?;
        if self.skipped > 0 {
            write!(f, " | Skipped: {}", self.skipped)?;
        }
        if let Some(report) = &self.telemetry {
            write!(
                f,
                "\nTelemetry: {} sent, {} failed",
                report.delivered, report.failed
            )?;
        }
        Ok(())
    }
}

/// Wires an issue source to the extraction pipeline
pub struct App<I, P>
where
    P: CompletionProvider + 'static,
{
    source: I,
    coordinator: PipelineCoordinator<P>,
    parallelism: usize,
    bar: ProgressBar,
}

impl<I, P> App<I, P>
where
    I: IssueSource,
    P: CompletionProvider + 'static,
{
    /// Create an app; `show_progress` draws a bar on stderr
    pub fn new(source: I, extractor: Extractor<P>, show_progress: bool) -> Self {
        let parallelism = extractor.config().max_parallelism;
        let bar = if show_progress {
            progress_bar()
        } else {
            ProgressBar::hidden()
        };

        let observed = bar.clone();
        let progress = Progress::new().with_observer(move |completed, total| {
            observed.set_length(total as u64);
            observed.set_position(completed as u64);
        });

        Self {
            source,
            coordinator: PipelineCoordinator::new(extractor).with_progress(progress),
            parallelism,
            bar,
        }
    }

    /// Token that stops the pipeline from starting further issues
    pub fn cancellation_token(&self) -> CancellationToken {
        self.coordinator.cancellation_token()
    }

    /// Fetch open issues and extract them
    pub async fn extract(&self, owner: &str, repo: &str) -> Result<BatchResult> {
        let issues = self
            .source
            .open_issues(owner, repo)
            .await
            .map_err(|e| CliError::Fetch(e.to_string()))?;

        let texts: Vec<String> = issues.into_iter().map(RawIssue::into_text).collect();
        self.bar.set_length(texts.len() as u64);
        self.bar.set_position(0);

        let batch = self.coordinator.run(texts, self.parallelism).await;
        self.bar.finish_and_clear();
        Ok(batch?)
    }

    /// Extract, then print a report instead of emitting telemetry
    pub async fn run_dry<W: Write>(
        &self,
        owner: &str,
        repo: &str,
        reporter: &mut DryRunReporter<W>,
    ) -> Result<RunSummary> {
        let batch = self.extract(owner, repo).await?;
        reporter.report(&batch.records)?;
        Ok(RunSummary::from_batch(&batch))
    }

    /// Extract, then send one event per record and close the sink
    pub async fn run_with_sink<S: TelemetrySink>(
        &self,
        owner: &str,
        repo: &str,
        sink: &S,
    ) -> Result<RunSummary> {
        let batch = self.extract(owner, repo).await?;
        info!("Sending {} events", batch.records.len());
        let report = emit_and_close(&batch.records, sink).await;

        Ok(RunSummary {
            telemetry: Some(report),
            ..RunSummary::from_batch(&batch)
        })
    }
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}
