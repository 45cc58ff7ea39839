use std::fmt;

use crate::Record;

/// Shortest match worth keeping (20 minutes).
pub const MIN_DURATION_SECS: u32 = 1200;
pub const FULL_LOBBY_PLAYERS: u32 = 10;
pub const IN_SCOPE_GAME_MODE: u32 = 22;

/// First criterion a record failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Leaver,
    TooShort { duration_seconds: u32 },
    NotFullLobby { player_count: u32 },
    WrongMode { mode: u32 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Leaver => write!(f, "a player left early"),
            Rejection::TooShort { duration_seconds } => {
                write!(f, "duration {duration_seconds}s below {MIN_DURATION_SECS}s")
            }
            Rejection::NotFullLobby { player_count } => {
                write!(f, "{player_count} human players instead of {FULL_LOBBY_PLAYERS}")
            }
            Rejection::WrongMode { mode } => write!(f, "game mode {mode} out of scope"),
        }
    }
}

/// Checks the criteria in order and reports the first one that fails.
pub fn rejection(record: &Record) -> Option<Rejection> {
    if record.has_leaver() {
        return Some(Rejection::Leaver);
    }
    if record.duration_seconds < MIN_DURATION_SECS {
        return Some(Rejection::TooShort {
            duration_seconds: record.duration_seconds,
        });
    }
    if record.player_count != FULL_LOBBY_PLAYERS {
        return Some(Rejection::NotFullLobby {
            player_count: record.player_count,
        });
    }
    if record.mode != IN_SCOPE_GAME_MODE {
        return Some(Rejection::WrongMode { mode: record.mode });
    }
    None
}

pub fn is_valid(record: &Record) -> bool {
    rejection(record).is_none()
}
