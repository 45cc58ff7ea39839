use crate::Cursor;

/// Most records the source hands out per call.
pub const MAX_BATCH_LIMIT: u32 = 100;
/// Upstream quota: 100000 calls of 100 records per day.
pub const DAILY_LIMIT: u64 = 100_000 * 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRequest {
    pub cursor: Cursor,
    /// Always within `1..=MAX_BATCH_LIMIT`.
    pub limit: u32,
}

/// How a run target is split into requests: full batches followed by one
/// partial batch for the remainder, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    target: u64,
    batch_limit: u32,
    full_batches: u64,
    remainder: u32,
}

impl BatchPlan {
    pub fn new(requested: u64, batch_limit: u32, daily_limit: u64) -> Self {
        let batch_limit = batch_limit.clamp(1, MAX_BATCH_LIMIT);
        let target = requested.min(daily_limit);
        let full_batches = target / u64::from(batch_limit);
        let remainder = (target % u64::from(batch_limit)) as u32;
        Self {
            target,
            batch_limit,
            full_batches,
            remainder,
        }
    }

    /// Target after the daily ceiling was applied.
    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn batch_limit(&self) -> u32 {
        self.batch_limit
    }

    pub fn len(&self) -> u64 {
        self.full_batches + u64::from(self.remainder > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sizes(&self) -> BatchSizes {
        BatchSizes {
            plan: *self,
            issued: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchSizes {
    plan: BatchPlan,
    issued: u64,
}

impl Iterator for BatchSizes {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let size = if self.issued < self.plan.full_batches {
            self.plan.batch_limit
        } else if self.issued == self.plan.full_batches && self.plan.remainder > 0 {
            self.plan.remainder
        } else {
            return None;
        };
        self.issued += 1;
        Some(size)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.plan.len().saturating_sub(self.issued);
        let left = usize::try_from(left).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}
