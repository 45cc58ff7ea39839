pub type MatchId = u64;
pub type SequenceNumber = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Player {
    pub left_early: bool,
}

impl Player {
    pub fn stayed() -> Self {
        Self { left_early: false }
    }

    pub fn leaver() -> Self {
        Self { left_early: true }
    }
}

/// One match as reported by the history source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: MatchId,
    pub sequence_number: SequenceNumber,
    pub duration_seconds: u32,
    pub player_count: u32,
    pub mode: u32,
    /// Empty when the source omitted the roster.
    pub players: Vec<Player>,
}

impl Record {
    pub fn has_leaver(&self) -> bool {
        if self.players.is_empty() {
            return false;
        }
        self.players.iter().any(|player| player.left_early)
    }
}
