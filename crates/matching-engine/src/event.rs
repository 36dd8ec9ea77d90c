//! Events the engine pushes through its sink on every state change.
//!
//! These are the engine's own notion of "something happened"; they are
//! deliberately not the tape's wire format (that's `tape::TapeEvent`).
//! The Runner's sink closure is what turns one of these into a
//! persisted tape record, stamping session id and sequence at that
//! point.

use crate::domain::{Order, Trade};

#[derive(Debug, Clone)]
pub enum MatchingEvent {
    /// Emitted once per placement, before any trades it produced.
    OrderPlaced(Order),
    /// Emitted once per successful cancellation.
    OrderCancelled(Order),
    /// Emitted once per trade produced by a placement, in fill order.
    Trade(Trade),
}
