use miner_logging::{miner_info, miner_warn};

use crate::HarvestEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: HarvestEvent);
}

/// Reports harvest progress through the global logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: HarvestEvent) {
        match event {
            HarvestEvent::Started {
                cursor,
                target,
                batches,
            } => {
                miner_info!(
                    "Start mining at sequence {} (target {} records in {} batches)",
                    cursor,
                    target,
                    batches
                );
            }
            HarvestEvent::RetryScheduled {
                batch,
                attempt,
                error,
                backoff,
            } => {
                miner_warn!(
                    "Batch {} failed ({}); attempt {} in {}s",
                    batch,
                    error,
                    attempt,
                    backoff.as_secs()
                );
            }
            HarvestEvent::BatchCompleted {
                batch,
                records,
                records_seen,
                identifiers_accepted,
                cursor,
            } => {
                miner_info!(
                    "Batch {}: {} records; processed {} games, kept {}, next sequence {}",
                    batch,
                    records,
                    records_seen,
                    identifiers_accepted,
                    cursor
                );
            }
            HarvestEvent::Finished(summary) => {
                miner_info!(
                    "Finished after {} batches: {} games seen, {} kept, cursor {} -> {} ({})",
                    summary.batches_attempted,
                    summary.records_seen,
                    summary.identifiers_accepted,
                    summary.start_cursor,
                    summary.final_cursor,
                    summary.stop_reason
                );
            }
        }
    }
}
