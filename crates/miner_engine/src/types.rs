use std::fmt;
use std::time::Duration;

use miner_core::{Cursor, RunSummary};

/// Body and headers of one answered request, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestEvent {
    Started {
        cursor: Cursor,
        target: u64,
        batches: u64,
    },
    RetryScheduled {
        batch: u64,
        attempt: u32,
        error: FetchError,
        backoff: Duration,
    },
    BatchCompleted {
        batch: u64,
        records: usize,
        records_seen: u64,
        identifiers_accepted: u64,
        cursor: Cursor,
    },
    Finished(RunSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
    MalformedBody,
    MissingField(&'static str),
    UpstreamStatus(i64),
}

impl FailureKind {
    /// Bad credentials and a broken base URL fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            FailureKind::InvalidUrl | FailureKind::HttpStatus(401) | FailureKind::HttpStatus(403)
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::MissingField(field) => write!(f, "response missing `{field}`"),
            FailureKind::UpstreamStatus(status) => write!(f, "upstream status {status}"),
        }
    }
}
