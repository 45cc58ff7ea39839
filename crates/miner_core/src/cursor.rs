use std::fmt;
use std::str::FromStr;

use crate::SequenceNumber;

/// The smallest sequence number not yet fully processed.
///
/// Only ever moves forward while the process runs; a manual edit of the
/// persisted file is the one way to roll it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor(SequenceNumber);

impl Cursor {
    pub const fn new(value: SequenceNumber) -> Self {
        Self(value)
    }

    pub const fn get(self) -> SequenceNumber {
        self.0
    }

    /// Moves the cursor just past `seq`. Returns `false` and leaves the
    /// cursor untouched when that would move it backwards.
    pub fn advance_past(&mut self, seq: SequenceNumber) -> bool {
        let next = seq.saturating_add(1);
        if next < self.0 {
            return false;
        }
        self.0 = next;
        true
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCursorError {
    #[error("cursor value is empty")]
    Empty,
    #[error("cursor value {0:?} is not a non-negative integer")]
    NotAnInteger(String),
}

impl FromStr for Cursor {
    type Err = ParseCursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseCursorError::Empty);
        }
        trimmed
            .parse::<SequenceNumber>()
            .map(Cursor)
            .map_err(|_| ParseCursorError::NotAnInteger(trimmed.to_string()))
    }
}
