use miner_core::{Player, Record};
use serde::Deserialize;

use crate::{FailureKind, FetchError};

/// Status the match history endpoint reports on success.
const STATUS_OK: i64 = 1;
/// `leaver_status` value for a player who stayed until the end.
const LEAVER_STATUS_NONE: u32 = 0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("cannot parse response: {0}")]
    Malformed(String),
    #[error("response has no `{0}`")]
    MissingField(&'static str),
    #[error("source reported status {status}: {detail}")]
    UpstreamStatus { status: i64, detail: String },
}

impl From<DecodeError> for FetchError {
    fn from(err: DecodeError) -> Self {
        let kind = match &err {
            DecodeError::Malformed(_) => FailureKind::MalformedBody,
            DecodeError::MissingField(field) => FailureKind::MissingField(*field),
            DecodeError::UpstreamStatus { status, .. } => FailureKind::UpstreamStatus(*status),
        };
        FetchError::new(kind, err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    result: Option<HistoryPage>,
}

#[derive(Debug, Deserialize)]
struct HistoryPage {
    status: Option<i64>,
    #[serde(rename = "statusDetail")]
    status_detail: Option<String>,
    matches: Option<Vec<WireMatch>>,
}

// Optional fields accept both an absent key and an explicit `null`.
#[derive(Debug, Deserialize)]
struct WireMatch {
    match_id: u64,
    match_seq_num: u64,
    #[serde(default)]
    duration: Option<u32>,
    #[serde(default)]
    human_players: Option<u32>,
    #[serde(default)]
    game_mode: Option<u32>,
    #[serde(default)]
    players: Option<Vec<WirePlayer>>,
}

#[derive(Debug, Deserialize)]
struct WirePlayer {
    leaver_status: Option<u32>,
}

impl From<WireMatch> for Record {
    fn from(wire: WireMatch) -> Self {
        Record {
            id: wire.match_id,
            sequence_number: wire.match_seq_num,
            duration_seconds: wire.duration.unwrap_or_default(),
            player_count: wire.human_players.unwrap_or_default(),
            mode: wire.game_mode.unwrap_or_default(),
            players: wire
                .players
                .unwrap_or_default()
                .into_iter()
                .map(|p| Player {
                    // An absent status is not proof the player stayed.
                    left_early: p.leaver_status != Some(LEAVER_STATUS_NONE),
                })
                .collect(),
        }
    }
}

/// Decode a match history page into records, in the order the source sent them.
pub fn decode_batch(body: &[u8]) -> Result<Vec<Record>, DecodeError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|err| DecodeError::Malformed(err.to_string()))?;
    let page = envelope.result.ok_or(DecodeError::MissingField("result"))?;

    if let Some(status) = page.status {
        if status != STATUS_OK {
            return Err(DecodeError::UpstreamStatus {
                status,
                detail: page.status_detail.unwrap_or_default(),
            });
        }
    }

    let matches = page.matches.ok_or(DecodeError::MissingField("matches"))?;
    Ok(matches.into_iter().map(Record::from).collect())
}
