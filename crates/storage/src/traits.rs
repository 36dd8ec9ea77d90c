//! Trait seams for the external tape index, OHLCV store, snapshot
//! store, and session store — kept synchronous because the simulation
//! loop never suspends on wall-clock I/O, so there is no reason for
//! these traits to be `async`.

use crate::StorageError;
use market_data::{OhlcvBar, TimestampedSnapshot};

pub type Result<T> = std::result::Result<T, StorageError>;

/// One row supplied via the tape writer's indexer callback.
#[derive(Debug, Clone, PartialEq)]
pub struct TapeIndexRow {
    pub session_id: String,
    pub event_id: String,
    pub event_type: String,
    pub timestamp: i64,
    pub sequence: u64,
    pub file_offset: u64,
}

/// Range queries over the tape index by `(session_id, timestamp)` or
/// `(session_id, event_type)`.
pub trait TapeIndexStore {
    fn insert(&mut self, row: TapeIndexRow) -> Result<()>;
    fn range_by_time(&self, session_id: &str, from_ms: i64, to_ms: i64) -> Result<Vec<TapeIndexRow>>;
    fn by_event_type(&self, session_id: &str, event_type: &str) -> Result<Vec<TapeIndexRow>>;
}

/// Upsert semantics on `(session_id, resolution_ms, interval_start)`.
/// Higher resolutions are derived lazily by consumers via
/// `market_data::rebucket`, not stored here.
pub trait OhlcvStore {
    fn upsert(&mut self, session_id: &str, bar: OhlcvBar) -> Result<()>;
    fn range(
        &self,
        session_id: &str,
        resolution_ms: i64,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<OhlcvBar>>;
}

/// Write-once snapshots keyed by `(session_id, timestamp)`, with
/// range and "at or before T" queries.
pub trait SnapshotStore {
    fn insert(&mut self, session_id: &str, snapshot: TimestampedSnapshot) -> Result<()>;
    fn range(&self, session_id: &str, from_ms: i64, to_ms: i64) -> Result<Vec<TimestampedSnapshot>>;
    fn at_or_before(&self, session_id: &str, timestamp_ms: i64) -> Result<Option<TimestampedSnapshot>>;
}

/// Keyed by `session_id`, holding status, serialized config, and
/// rolling counters.
pub trait SessionStore {
    fn upsert(&mut self, session: crate::SessionRecord) -> Result<()>;
    fn get(&self, session_id: &str) -> Result<Option<crate::SessionRecord>>;
    fn list(&self) -> Result<Vec<crate::SessionRecord>>;
}
