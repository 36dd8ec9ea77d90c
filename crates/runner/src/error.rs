//! Runner error types. Configuration errors are the only class that
//! can abort construction; everything a running session hits instead
//! gets recorded on the session record rather than propagated upward.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("invalid configuration: {0:?}")]
    InvalidConfig(Vec<config::ValidationError>),

    #[error("agent '{agent_id}': failed to parse archetype params: {source}")]
    AgentParams {
        agent_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("agent '{agent_id}': {source}")]
    AgentConstruction {
        agent_id: String,
        #[source]
        source: agents::AgentError,
    },

    #[error("tape I/O error: {0}")]
    Tape(#[from] tape::TapeError),
}
