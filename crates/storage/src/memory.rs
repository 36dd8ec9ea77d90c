//! In-memory reference implementations of the store traits. Useful
//! for tests and for a CLI run that doesn't want a database — not a
//! substitute for the production relational index / blob store, which
//! are external collaborators.

use crate::traits::{OhlcvStore, SessionStore, SnapshotStore, TapeIndexRow, TapeIndexStore};
use crate::{Result, SessionRecord, StorageError};
use market_data::{OhlcvBar, TimestampedSnapshot};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct InMemoryTapeIndex {
    rows: Vec<TapeIndexRow>,
}

impl InMemoryTapeIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TapeIndexStore for InMemoryTapeIndex {
    fn insert(&mut self, row: TapeIndexRow) -> Result<()> {
        self.rows.push(row);
        Ok(())
    }

    fn range_by_time(&self, session_id: &str, from_ms: i64, to_ms: i64) -> Result<Vec<TapeIndexRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.session_id == session_id && r.timestamp >= from_ms && r.timestamp <= to_ms)
            .cloned()
            .collect())
    }

    fn by_event_type(&self, session_id: &str, event_type: &str) -> Result<Vec<TapeIndexRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.session_id == session_id && r.event_type == event_type)
            .cloned()
            .collect())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryOhlcvStore {
    // (session_id, resolution_ms, interval_start) -> bar
    bars: HashMap<(String, i64, i64), OhlcvBar>,
}

impl InMemoryOhlcvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OhlcvStore for InMemoryOhlcvStore {
    fn upsert(&mut self, session_id: &str, bar: OhlcvBar) -> Result<()> {
        self.bars
            .insert((session_id.to_string(), bar.resolution_ms, bar.interval_start), bar);
        Ok(())
    }

    fn range(
        &self,
        session_id: &str,
        resolution_ms: i64,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<OhlcvBar>> {
        let mut out: Vec<OhlcvBar> = self
            .bars
            .iter()
            .filter(|((sid, res, start), _)| {
                sid == session_id && *res == resolution_ms && *start >= from_ms && *start <= to_ms
            })
            .map(|(_, bar)| *bar)
            .collect();
        out.sort_by_key(|b| b.interval_start);
        Ok(out)
    }
}

#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    // (session_id, timestamp) -> snapshot, kept sorted per session on insert
    snapshots: HashMap<String, Vec<TimestampedSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn insert(&mut self, session_id: &str, snapshot: TimestampedSnapshot) -> Result<()> {
        let entry = self.snapshots.entry(session_id.to_string()).or_default();
        if entry.iter().any(|s| s.timestamp == snapshot.timestamp) {
            return Err(StorageError::Duplicate(format!(
                "snapshot already exists for ({session_id}, {})",
                snapshot.timestamp
            )));
        }
        entry.push(snapshot);
        entry.sort_by_key(|s| s.timestamp);
        Ok(())
    }

    fn range(&self, session_id: &str, from_ms: i64, to_ms: i64) -> Result<Vec<TimestampedSnapshot>> {
        Ok(self
            .snapshots
            .get(session_id)
            .map(|v| {
                v.iter()
                    .filter(|s| s.timestamp >= from_ms && s.timestamp <= to_ms)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn at_or_before(&self, session_id: &str, timestamp_ms: i64) -> Result<Option<TimestampedSnapshot>> {
        Ok(self.snapshots.get(session_id).and_then(|v| {
            v.iter()
                .filter(|s| s.timestamp <= timestamp_ms)
                .next_back()
                .cloned()
        }))
    }
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: HashMap<String, SessionRecord>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn upsert(&mut self, session: SessionRecord) -> Result<()> {
        self.sessions.insert(session.session_id.clone(), session);
        Ok(())
    }

    fn get(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        Ok(self.sessions.get(session_id).cloned())
    }

    fn list(&self) -> Result<Vec<SessionRecord>> {
        let mut out: Vec<SessionRecord> = self.sessions.values().cloned().collect();
        out.sort_by_key(|s| s.created_at_ms);
        Ok(out)
    }
}
