use std::fmt;

use crate::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every planned batch was issued.
    Completed,
    /// The source returned an empty batch.
    NoMoreData,
    /// A batch failed on every attempt the retry policy allowed.
    RetriesExhausted { attempts: u32 },
    /// The source answered with a failure that retrying cannot fix.
    Rejected,
}

impl StopReason {
    pub fn is_early(self) -> bool {
        !matches!(self, StopReason::Completed)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Completed => write!(f, "all planned batches issued"),
            StopReason::NoMoreData => write!(f, "source has no more data"),
            StopReason::RetriesExhausted { attempts } => {
                write!(f, "batch failed {attempts} times in a row")
            }
            StopReason::Rejected => write!(f, "source rejected the request"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub batches_attempted: u64,
    pub records_seen: u64,
    pub identifiers_accepted: u64,
    pub stopped_early: bool,
    pub stop_reason: StopReason,
    pub start_cursor: Cursor,
    pub final_cursor: Cursor,
}
