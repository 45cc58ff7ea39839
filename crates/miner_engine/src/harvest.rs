use miner_core::{
    BatchPlan, BatchRequest, HarvestState, Record, RunSummary, StopReason, Verdict, DAILY_LIMIT,
    MAX_BATCH_LIMIT,
};
use miner_logging::{miner_error, miner_info, miner_trace, miner_warn};

use crate::{
    decode_batch, CursorError, CursorStore, FetchError, HarvestEvent, IdentifierSink,
    LogProgressSink, ProgressSink, RetryPolicy, SinkError, Sleeper, TokioSleeper, Transport,
};

/// Limits that shape one harvest run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Records per request; clamped into `1..=MAX_BATCH_LIMIT` when planning.
    pub batch_limit: u32,
    pub daily_limit: u64,
    pub retry: RetryPolicy,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            batch_limit: MAX_BATCH_LIMIT,
            daily_limit: DAILY_LIMIT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Failures that end a run without a summary. Fetch failures never show up
/// here: they are retried and, at worst, stop the run early.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error(transparent)]
    Cursor(#[from] CursorError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Sequential cursor-driven harvest loop.
pub struct Harvester {
    config: HarvestConfig,
    transport: Box<dyn Transport>,
    cursor_store: Box<dyn CursorStore>,
    sink: Box<dyn IdentifierSink>,
    sleeper: Box<dyn Sleeper>,
    progress: Box<dyn ProgressSink>,
}

impl Harvester {
    pub fn new(
        config: HarvestConfig,
        transport: Box<dyn Transport>,
        cursor_store: Box<dyn CursorStore>,
        sink: Box<dyn IdentifierSink>,
    ) -> Self {
        Self {
            config,
            transport,
            cursor_store,
            sink,
            sleeper: Box::new(TokioSleeper),
            progress: Box::new(LogProgressSink),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Harvest up to `target_count` records starting at the persisted cursor.
    ///
    /// The cursor is checkpointed after every batch and once more before
    /// returning, so the next run resumes right after the last record seen.
    pub async fn run(&mut self, target_count: u64) -> Result<RunSummary, HarvestError> {
        let start = self.cursor_store.load()?;
        let plan = BatchPlan::new(
            target_count,
            self.config.batch_limit,
            self.config.daily_limit,
        );
        let mut state = HarvestState::new(start);
        self.progress.emit(HarvestEvent::Started {
            cursor: start,
            target: plan.target(),
            batches: plan.len(),
        });

        for (batch, limit) in plan.sizes().enumerate() {
            let batch = batch as u64;
            let request = state.begin_batch(limit);
            let records = match self.fetch_batch(&mut state, batch, request).await {
                Ok(records) => records,
                Err(reason) => {
                    state.finish(reason);
                    break;
                }
            };

            if records.is_empty() {
                miner_info!("No matches after sequence {}; stopping", request.cursor);
                state.finish(StopReason::NoMoreData);
                break;
            }

            for record in &records {
                match state.validate(record) {
                    Verdict::Accepted(id) => self.sink.append(id)?,
                    Verdict::Rejected(reason) => {
                        miner_trace!("Skipping match {}: {}", record.id, reason);
                    }
                }
                if !state.advance(record) {
                    miner_warn!(
                        "Match {} has sequence {} behind cursor {}; cursor kept",
                        record.id,
                        record.sequence_number,
                        state.cursor()
                    );
                }
            }

            self.progress.emit(HarvestEvent::BatchCompleted {
                batch,
                records: records.len(),
                records_seen: state.records_seen(),
                identifiers_accepted: state.identifiers_accepted(),
                cursor: state.cursor(),
            });
            self.cursor_store.save(state.cursor())?;
        }

        if !state.is_done() {
            state.finish(StopReason::Completed);
        }
        self.cursor_store.save(state.cursor())?;

        let summary = state.summary();
        self.progress.emit(HarvestEvent::Finished(summary.clone()));
        Ok(summary)
    }

    /// Fetch and decode one batch, retrying transient failures per the policy.
    async fn fetch_batch(
        &self,
        state: &mut HarvestState,
        batch: u64,
        request: BatchRequest,
    ) -> Result<Vec<Record>, StopReason> {
        let policy = self.config.retry;
        let mut attempt = 1;
        loop {
            match self.fetch_once(request).await {
                Ok(records) => {
                    state.resume_request();
                    return Ok(records);
                }
                Err(err) if !err.is_retryable() => {
                    miner_error!("Batch {} rejected by source: {}", batch, err);
                    return Err(StopReason::Rejected);
                }
                Err(err) => {
                    if !policy.allows_another(attempt) {
                        miner_error!(
                            "Giving up on batch {} after {} attempts: {}",
                            batch,
                            attempt,
                            err
                        );
                        return Err(StopReason::RetriesExhausted { attempts: attempt });
                    }
                    self.progress.emit(HarvestEvent::RetryScheduled {
                        batch,
                        attempt: attempt + 1,
                        error: err,
                        backoff: policy.backoff,
                    });
                    self.sleeper.sleep(policy.backoff).await;
                    attempt = state.schedule_retry();
                }
            }
        }
    }

    async fn fetch_once(&self, request: BatchRequest) -> Result<Vec<Record>, FetchError> {
        let raw = self.transport.fetch(request).await?;
        decode_batch(&raw.body).map_err(|err| {
            miner_warn!(
                "Cannot decode response (HTTP {}, content type {}): {}",
                raw.status,
                raw.content_type.as_deref().unwrap_or("unknown"),
                err
            );
            FetchError::from(err)
        })
    }
}
