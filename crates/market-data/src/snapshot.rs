//! Book snapshot construction for external consumers.
//!
//! The matching engine's own [`matching_engine::OrderBookSnapshot`] is
//! an in-memory, untimestamped view; this module stamps it with the
//! session/time identity the snapshot store and tape need, matching
//! the write-once `(sessionId, timestamp)` keying in the external
//! snapshot store.

use matching_engine::{BookLevel, MatchingEngine};
use serde::{Deserialize, Serialize};

/// A book snapshot ready to be persisted: the engine's depth-limited
/// view plus the identity it's keyed by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampedSnapshot {
    pub session_id: String,
    pub timestamp: i64,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    pub last_trade_price: Option<f64>,
    pub last_trade_quantity: Option<u32>,
}

/// Build a depth-limited, timestamped snapshot of `engine`'s book.
pub fn build_snapshot(
    engine: &MatchingEngine,
    session_id: &str,
    timestamp: i64,
    depth: usize,
) -> TimestampedSnapshot {
    let snap = engine.snapshot(depth);
    TimestampedSnapshot {
        session_id: session_id.to_string(),
        timestamp,
        bids: snap.bids,
        asks: snap.asks,
        last_trade_price: snap.last_trade_price,
        last_trade_quantity: snap.last_trade_quantity,
    }
}
