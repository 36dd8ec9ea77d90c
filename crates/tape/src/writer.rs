//! Append-only tape writer.
//!
//! Wraps any [`std::io::Write`] sink (a file in the CLI, a `Vec<u8>` in
//! tests). Each accepted record is assigned a monotonic `sequence`
//! (starting at 1) and a string id `EVT-` + zero-padded sequence,
//! serialized as one line of self-delimiting JSON, and the byte offset
//! at which the record begins is reported to an indexer callback.

use crate::event::{AgentThoughtEvent, PersistedNewsEvent, TapeEvent};
use crate::TapeError;
use market_data::TimestampedSnapshot;
use matching_engine::{Order, Trade};
use std::io::Write;

/// `(id, event_type, timestamp, sequence, offset)` reported for every
/// accepted record, for external indexing.
pub type IndexerFn<'a> = dyn FnMut(&str, &str, i64, u64, u64) + 'a;

pub struct TapeWriter<W: Write> {
    sink: W,
    session_id: String,
    sequence: u64,
    offset: u64,
    indexer: Box<IndexerFn<'static>>,
}

impl<W: Write> TapeWriter<W> {
    pub fn new(sink: W, session_id: impl Into<String>) -> Self {
        Self::with_indexer(sink, session_id, |_, _, _, _, _| {})
    }

    pub fn with_indexer(
        sink: W,
        session_id: impl Into<String>,
        indexer: impl FnMut(&str, &str, i64, u64, u64) + 'static,
    ) -> Self {
        Self {
            sink,
            session_id: session_id.into(),
            sequence: 0,
            offset: 0,
            indexer: Box::new(indexer),
        }
    }

    fn next_id(&mut self) -> (String, u64) {
        self.sequence += 1;
        (format!("EVT-{:06}", self.sequence), self.sequence)
    }

    fn append(&mut self, event: TapeEvent) -> Result<(), TapeError> {
        let line_offset = self.offset;
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        self.sink.write_all(&line)?;
        self.offset += line.len() as u64;
        (self.indexer)(event.id(), event.type_name(), event.timestamp(), event.sequence(), line_offset);
        Ok(())
    }

    pub fn write_order_placed(&mut self, order: Order, timestamp: i64) -> Result<(), TapeError> {
        let (id, sequence) = self.next_id();
        self.append(TapeEvent::OrderPlaced {
            id,
            session_id: self.session_id.clone(),
            sequence,
            timestamp,
            order,
        })
    }

    pub fn write_order_cancelled(&mut self, order: Order, timestamp: i64) -> Result<(), TapeError> {
        let (id, sequence) = self.next_id();
        self.append(TapeEvent::OrderCancelled {
            id,
            session_id: self.session_id.clone(),
            sequence,
            timestamp,
            order,
        })
    }

    pub fn write_trade(&mut self, trade: Trade, timestamp: i64) -> Result<(), TapeError> {
        let (id, sequence) = self.next_id();
        self.append(TapeEvent::Trade {
            id,
            session_id: self.session_id.clone(),
            sequence,
            timestamp,
            trade,
        })
    }

    pub fn write_snapshot(&mut self, snapshot: TimestampedSnapshot, timestamp: i64) -> Result<(), TapeError> {
        let (id, sequence) = self.next_id();
        self.append(TapeEvent::BookSnapshot {
            id,
            session_id: self.session_id.clone(),
            sequence,
            timestamp,
            snapshot,
        })
    }

    /// Only accepts the redacted, `sentiment`-free payload — the
    /// in-memory `NewsEvent` cannot be passed here.
    pub fn write_news(&mut self, news: PersistedNewsEvent, timestamp: i64) -> Result<(), TapeError> {
        let (id, sequence) = self.next_id();
        self.append(TapeEvent::News {
            id,
            session_id: self.session_id.clone(),
            sequence,
            timestamp,
            news,
        })
    }

    pub fn write_agent_thought(&mut self, thought: AgentThoughtEvent, timestamp: i64) -> Result<(), TapeError> {
        let (id, sequence) = self.next_id();
        self.append(TapeEvent::AgentThought {
            id,
            session_id: self.session_id.clone(),
            sequence,
            timestamp,
            thought,
        })
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Flush and, where the sink supports it, fsync. Returns only once
    /// durable.
    pub fn close(mut self) -> Result<(), TapeError> {
        self.sink.flush()?;
        Ok(())
    }
}
