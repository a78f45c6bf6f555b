//! Telemetry emission: one event per record, failures counted not raised

use crate::flatten::flatten;
use issuelens_domain::traits::{DeliveryStats, TelemetrySink};
use issuelens_domain::Record;
use tracing::{debug, error, info, warn};

/// Totals for one emission run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Events built, one per record
    pub events: usize,

    /// Events the sink accepted
    pub accepted: usize,

    /// Events the destination confirmed, known after shutdown
    pub delivered: usize,

    /// Events rejected on send or lost during delivery
    pub failed: usize,
}

impl EmitReport {
    /// Fold in the sink's delivery totals
    pub fn with_delivery(mut self, stats: DeliveryStats) -> Self {
        self.delivered = stats.delivered;
        self.failed += stats.failed;
        self
    }
}

/// Send one event per record
///
/// A failed send is logged and counted; the remaining records are still
/// sent. The sink is not closed here.
pub async fn emit<S>(records: &[Record], sink: &S) -> EmitReport
where
    S: TelemetrySink,
{
    let mut report = EmitReport::default();

    for record in records {
        let event = flatten(record);
        report.events += 1;

        match sink.send(event).await {
            Ok(()) => {
                debug!("Queued event for issue {}", record.id);
                report.accepted += 1;
            }
            Err(e) => {
                warn!("Failed to send event for issue {}: {}", record.id, e);
                report.failed += 1;
            }
        }
    }

    report
}

/// Send one event per record, then close the sink and fold in its totals
///
/// If closing fails, every accepted event is counted as failed since its
/// delivery can no longer be confirmed.
pub async fn emit_and_close<S>(records: &[Record], sink: &S) -> EmitReport
where
    S: TelemetrySink,
{
    let report = emit(records, sink).await;

    let report = match sink.close().await {
        Ok(stats) => report.with_delivery(stats),
        Err(e) => {
            error!("Failed to flush telemetry sink: {}", e);
            EmitReport {
                failed: report.failed + report.accepted,
                ..report
            }
        }
    };

    info!(
        "Telemetry: {} events, {} delivered, {} failed",
        report.events, report.delivered, report.failed
    );
    report
}
