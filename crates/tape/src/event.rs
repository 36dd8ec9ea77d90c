//! Tape event payloads.
//!
//! `NewsEvent` (in-memory, carries `sentiment`) and `PersistedNewsEvent`
//! (tape wire form, no `sentiment` field) are deliberately distinct
//! types: the tape writer's `append` only accepts the latter, so the
//! redaction rule can't be bypassed by a future caller forgetting to
//! strip a field at the call site.

use matching_engine::{Order, Trade};
use market_data::TimestampedSnapshot;
use serde::{Deserialize, Serialize};

/// News sentiment, as scheduled in the session config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn is_material(&self) -> bool {
        !matches!(self, Sentiment::Neutral)
    }
}

/// News magnitude, used by the fundamentals archetype to scale its
/// reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Magnitude {
    Low,
    Medium,
    High,
}

/// In-memory news event, available to agents for the tick it's
/// released on. Never serialized to the tape directly.
///
/// `id` is assigned by the Runner from the session's news-sequence
/// counter as each item is released, never derived from `headline` or
/// `timestamp` — agents dedup reactions against it, and two distinct
/// items released in the same tick must not collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsEvent {
    pub id: String,
    pub timestamp: i64,
    pub headline: String,
    pub content: String,
    pub sentiment: Sentiment,
    pub magnitude: Magnitude,
    pub source: String,
}

impl NewsEvent {
    /// Strip `sentiment`/`magnitude` to the form the tape is allowed to
    /// persist. `id` carries over untouched; it isn't material like
    /// sentiment, so redacting it would only break tape consumers that
    /// want to correlate a `news` line with an agent's reaction.
    pub fn redact(&self) -> PersistedNewsEvent {
        PersistedNewsEvent {
            id: self.id.clone(),
            timestamp: self.timestamp,
            headline: self.headline.clone(),
            content: self.content.clone(),
            source: self.source.clone(),
        }
    }
}

/// Tape wire form of a news event. Has no `sentiment` field by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedNewsEvent {
    pub id: String,
    pub timestamp: i64,
    pub headline: String,
    pub content: String,
    pub source: String,
}

/// An agent's natural-language rationale for an action, persisted
/// after the action executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentThoughtEvent {
    pub agent_id: String,
    pub thought: String,
    pub timestamp: i64,
    /// Set when the thought accompanies a trapped agent error rather
    /// than a normal action.
    pub is_error: bool,
}

/// The sum type written to the tape. Every variant carries a stable
/// `id`, a strictly increasing `sequence`, and a `timestamp`, assigned
/// by [`crate::writer::TapeWriter`] at append time — not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TapeEvent {
    OrderPlaced {
        id: String,
        session_id: String,
        sequence: u64,
        timestamp: i64,
        order: Order,
    },
    OrderCancelled {
        id: String,
        session_id: String,
        sequence: u64,
        timestamp: i64,
        order: Order,
    },
    Trade {
        id: String,
        session_id: String,
        sequence: u64,
        timestamp: i64,
        trade: Trade,
    },
    BookSnapshot {
        id: String,
        session_id: String,
        sequence: u64,
        timestamp: i64,
        snapshot: TimestampedSnapshot,
    },
    News {
        id: String,
        session_id: String,
        sequence: u64,
        timestamp: i64,
        news: PersistedNewsEvent,
    },
    AgentThought {
        id: String,
        session_id: String,
        sequence: u64,
        timestamp: i64,
        thought: AgentThoughtEvent,
    },
}

impl TapeEvent {
    pub fn sequence(&self) -> u64 {
        match self {
            TapeEvent::OrderPlaced { sequence, .. }
            | TapeEvent::OrderCancelled { sequence, .. }
            | TapeEvent::Trade { sequence, .. }
            | TapeEvent::BookSnapshot { sequence, .. }
            | TapeEvent::News { sequence, .. }
            | TapeEvent::AgentThought { sequence, .. } => *sequence,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            TapeEvent::OrderPlaced { timestamp, .. }
            | TapeEvent::OrderCancelled { timestamp, .. }
            | TapeEvent::Trade { timestamp, .. }
            | TapeEvent::BookSnapshot { timestamp, .. }
            | TapeEvent::News { timestamp, .. }
            | TapeEvent::AgentThought { timestamp, .. } => *timestamp,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TapeEvent::OrderPlaced { id, .. }
            | TapeEvent::OrderCancelled { id, .. }
            | TapeEvent::Trade { id, .. }
            | TapeEvent::BookSnapshot { id, .. }
            | TapeEvent::News { id, .. }
            | TapeEvent::AgentThought { id, .. } => id,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TapeEvent::OrderPlaced { .. } => "order_placed",
            TapeEvent::OrderCancelled { .. } => "order_cancelled",
            TapeEvent::Trade { .. } => "trade",
            TapeEvent::BookSnapshot { .. } => "book_snapshot",
            TapeEvent::News { .. } => "news",
            TapeEvent::AgentThought { .. } => "agent_thought",
        }
    }
}
