//! The `Session` record: identity, status, config, and rolling
//! counters, owned by the external storage layer once the Runner
//! reports a transition.

use config::SimulationConfig;
use serde::{Deserialize, Serialize};

/// Session lifecycle. Transitions are `pending -> running ->
/// (completed | error)`; terminal states are sticky and the Runner
/// never re-enters a terminal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Running,
    Completed,
    Error,
}

impl SessionStatus {
    /// `completed`/`error` never transition further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Error)
    }
}

/// A reproducible simulation run, identified by `session_id` and fully
/// determined by `config` and `config.seed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub name: String,
    pub status: SessionStatus,
    pub config: SimulationConfig,
    pub created_at_ms: i64,
    pub completed_at_ms: Option<i64>,
    pub event_count: u64,
    pub trade_count: u64,
    pub final_price: Option<f64>,
}

impl SessionRecord {
    pub fn new(session_id: impl Into<String>, name: impl Into<String>, config: SimulationConfig, created_at_ms: i64) -> Self {
        Self {
            session_id: session_id.into(),
            name: name.into(),
            status: SessionStatus::Pending,
            config,
            created_at_ms,
            completed_at_ms: None,
            event_count: 0,
            trade_count: 0,
            final_price: None,
        }
    }
}
