//! Miner core: pure domain types, the validity filter and the harvest state machine.
mod cursor;
mod filter;
mod plan;
mod record;
mod state;
mod summary;

pub use cursor::{Cursor, ParseCursorError};
pub use filter::{
    is_valid, rejection, Rejection, FULL_LOBBY_PLAYERS, IN_SCOPE_GAME_MODE, MIN_DURATION_SECS,
};
pub use plan::{BatchPlan, BatchRequest, BatchSizes, DAILY_LIMIT, MAX_BATCH_LIMIT};
pub use record::{MatchId, Player, Record, SequenceNumber};
pub use state::{HarvestState, Phase, Verdict};
pub use summary::{RunSummary, StopReason};
