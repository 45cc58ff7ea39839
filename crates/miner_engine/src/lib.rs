//! Miner engine: transport, decoding, persistence and the harvest loop.
mod cursor_store;
mod decode;
mod harvest;
mod persist;
mod progress;
mod retry;
mod sink;
mod transport;
mod types;

pub use cursor_store::{CursorError, CursorStore, FileCursorStore};
pub use decode::{decode_batch, DecodeError};
pub use harvest::{HarvestConfig, HarvestError, Harvester};
pub use persist::{ensure_state_dir, AtomicFileWriter, PersistError};
pub use progress::{LogProgressSink, ProgressSink};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use sink::{AppendFileSink, IdentifierSink, SinkError};
pub use transport::{ReqwestTransport, Transport, TransportSettings, STEAM_MATCH_HISTORY_URL};
pub use types::{FailureKind, FetchError, HarvestEvent, RawResponse};
