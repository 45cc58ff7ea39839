use crate::{rejection, BatchRequest, Cursor, MatchId, Record, Rejection, RunSummary, StopReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Requesting { batch: u64, attempt: u32 },
    Retrying { batch: u64, attempt: u32 },
    Validating { batch: u64 },
    Advancing { batch: u64 },
    Done(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted(MatchId),
    Rejected(Rejection),
}

/// Bookkeeping for a single harvest run.
///
/// The engine drives the transitions; this type only records where the run
/// is and what it has seen so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestState {
    phase: Phase,
    start_cursor: Cursor,
    cursor: Cursor,
    batches_attempted: u64,
    records_seen: u64,
    identifiers_accepted: u64,
}

impl HarvestState {
    pub fn new(start: Cursor) -> Self {
        Self {
            phase: Phase::Idle,
            start_cursor: start,
            cursor: start,
            batches_attempted: 0,
            records_seen: 0,
            identifiers_accepted: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    pub fn identifiers_accepted(&self) -> u64 {
        self.identifiers_accepted
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done(_))
    }

    /// Starts the next batch at the current cursor.
    pub fn begin_batch(&mut self, limit: u32) -> BatchRequest {
        let batch = self.batches_attempted;
        self.batches_attempted += 1;
        self.phase = Phase::Requesting { batch, attempt: 1 };
        BatchRequest {
            cursor: self.cursor,
            limit,
        }
    }

    /// Records a failed attempt and returns the attempt number that follows.
    pub fn schedule_retry(&mut self) -> u32 {
        let (batch, attempt) = match self.phase {
            Phase::Requesting { batch, attempt } | Phase::Retrying { batch, attempt } => {
                (batch, attempt)
            }
            _ => (self.batches_attempted.saturating_sub(1), 1),
        };
        let next = attempt + 1;
        self.phase = Phase::Retrying {
            batch,
            attempt: next,
        };
        next
    }

    /// Marks the pending request as answered, returning to `Requesting`
    /// when a retry is underway.
    pub fn resume_request(&mut self) {
        if let Phase::Retrying { batch, attempt } = self.phase {
            self.phase = Phase::Requesting { batch, attempt };
        }
    }

    /// Runs the validity filter on one record of the current batch.
    pub fn validate(&mut self, record: &Record) -> Verdict {
        if let Phase::Requesting { batch, .. }
        | Phase::Retrying { batch, .. }
        | Phase::Advancing { batch } = self.phase
        {
            self.phase = Phase::Validating { batch };
        }
        match rejection(record) {
            None => {
                self.identifiers_accepted += 1;
                Verdict::Accepted(record.id)
            }
            Some(reason) => Verdict::Rejected(reason),
        }
    }

    /// Moves the cursor past a validated record, whatever its verdict.
    /// Returns `false` when the record sits behind the cursor, which stays put.
    pub fn advance(&mut self, record: &Record) -> bool {
        if let Phase::Validating { batch } = self.phase {
            self.phase = Phase::Advancing { batch };
        }
        self.records_seen += 1;
        self.cursor.advance_past(record.sequence_number)
    }

    /// `validate` followed by `advance`.
    pub fn observe(&mut self, record: &Record) -> Verdict {
        let verdict = self.validate(record);
        self.advance(record);
        verdict
    }

    pub fn finish(&mut self, reason: StopReason) {
        self.phase = Phase::Done(reason);
    }

    pub fn summary(&self) -> RunSummary {
        let stop_reason = match self.phase {
            Phase::Done(reason) => reason,
            _ => StopReason::Completed,
        };
        RunSummary {
            batches_attempted: self.batches_attempted,
            records_seen: self.records_seen,
            identifiers_accepted: self.identifiers_accepted,
            stopped_early: stop_reason.is_early(),
            stop_reason,
            start_cursor: self.start_cursor,
            final_cursor: self.cursor,
        }
    }
}
