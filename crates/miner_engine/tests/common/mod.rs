#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use miner_core::{BatchRequest, Cursor, MatchId};
use miner_engine::{
    CursorError, CursorStore, FailureKind, FetchError, HarvestEvent, IdentifierSink,
    ProgressSink, RawResponse, SinkError, Sleeper, Transport,
};
use serde_json::{json, Value};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(miner_logging::initialize_for_tests);
}

/// A match as the history endpoint would describe it.
pub fn wire_match(id: u64, seq: u64, valid: bool) -> Value {
    let leaver_status = if valid { 0 } else { 1 };
    let players: Vec<Value> = (0..10)
        .map(|slot| {
            json!({
                "account_id": 1000 + slot,
                "leaver_status": if slot == 0 { leaver_status } else { 0 },
            })
        })
        .collect();
    json!({
        "match_id": id,
        "match_seq_num": seq,
        "duration": 2100,
        "human_players": 10,
        "game_mode": 22,
        "players": players,
    })
}

pub fn page_body(matches: Vec<Value>) -> String {
    json!({
        "result": {
            "status": 1,
            "matches": matches,
        }
    })
    .to_string()
}

pub fn page(matches: Vec<Value>) -> Result<RawResponse, FetchError> {
    Ok(RawResponse {
        status: 200,
        content_type: Some("application/json".to_string()),
        body: page_body(matches).into_bytes(),
    })
}

/// A page of `count` consecutive matches starting at `first_seq`, every third one invalid.
pub fn consecutive_page(first_seq: u64, count: u64) -> Result<RawResponse, FetchError> {
    page(
        (first_seq..first_seq + count)
            .map(|seq| wire_match(seq * 10, seq, seq % 3 != 0))
            .collect(),
    )
}

pub fn network_error() -> Result<RawResponse, FetchError> {
    Err(FetchError::new(FailureKind::Network, "connection reset"))
}

/// Answers requests from a fixed script and remembers what was asked.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Result<RawResponse, FetchError>>>>,
    requests: Arc<Mutex<Vec<BatchRequest>>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<RawResponse, FetchError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<BatchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, request: BatchRequest) -> Result<RawResponse, FetchError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| page(Vec::new()))
    }
}

/// Serves consecutive sequence numbers forever, honouring cursor and limit.
#[derive(Clone, Default)]
pub struct EndlessTransport {
    requests: Arc<Mutex<Vec<BatchRequest>>>,
}

impl EndlessTransport {
    pub fn requests(&self) -> Vec<BatchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for EndlessTransport {
    async fn fetch(&self, request: BatchRequest) -> Result<RawResponse, FetchError> {
        self.requests.lock().unwrap().push(request);
        consecutive_page(request.cursor.get(), u64::from(request.limit))
    }
}

#[derive(Clone, Default)]
pub struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

#[derive(Clone, Default)]
pub struct MemoryCursorStore {
    current: Arc<Mutex<Option<Cursor>>>,
    saves: Arc<Mutex<Vec<Cursor>>>,
}

impl MemoryCursorStore {
    pub fn starting_at(value: u64) -> Self {
        Self {
            current: Arc::new(Mutex::new(Some(Cursor::new(value)))),
            saves: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn current(&self) -> Option<Cursor> {
        *self.current.lock().unwrap()
    }

    pub fn saves(&self) -> Vec<Cursor> {
        self.saves.lock().unwrap().clone()
    }
}

impl CursorStore for MemoryCursorStore {
    fn load(&self) -> Result<Cursor, CursorError> {
        self.current().ok_or_else(|| CursorError::Missing {
            path: "memory".into(),
        })
    }

    fn save(&self, cursor: Cursor) -> Result<(), CursorError> {
        *self.current.lock().unwrap() = Some(cursor);
        self.saves.lock().unwrap().push(cursor);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemorySink {
    ids: Arc<Mutex<Vec<MatchId>>>,
    fail_after: Option<usize>,
}

impl MemorySink {
    /// Accepts `count` ids, then reports a write failure.
    pub fn failing_after(count: usize) -> Self {
        Self {
            ids: Arc::new(Mutex::new(Vec::new())),
            fail_after: Some(count),
        }
    }

    pub fn ids(&self) -> Vec<MatchId> {
        self.ids.lock().unwrap().clone()
    }
}

impl IdentifierSink for MemorySink {
    fn append(&mut self, id: MatchId) -> Result<(), SinkError> {
        let mut ids = self.ids.lock().unwrap();
        if self.fail_after.is_some_and(|limit| ids.len() >= limit) {
            return Err(SinkError::Write {
                path: "memory".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        ids.push(id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct TestProgress {
    events: Arc<Mutex<Vec<HarvestEvent>>>,
}

impl TestProgress {
    pub fn take(&self) -> Vec<HarvestEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestProgress {
    fn emit(&self, event: HarvestEvent) {
        self.events.lock().unwrap().push(event);
    }
}
