//! Agent construction error types

use thiserror::Error;

/// Raised when an archetype's parameters fail validation at
/// construction time — part of the configuration-error class that
/// fails fast before the session leaves `pending`.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("agent '{agent_id}': {reason}")]
    InvalidParams { agent_id: String, reason: String },
}
