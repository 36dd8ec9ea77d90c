//! Tape error types

use thiserror::Error;

/// I/O or serialization errors from the tape sink. Fatal to the
/// session: the Runner catches these, transitions to `error`, and
/// closes the tape without rewriting any partial record.
#[derive(Error, Debug)]
pub enum TapeError {
    #[error("tape sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize tape event: {0}")]
    Serialization(#[from] serde_json::Error),
}
