//! Storage error types

use thiserror::Error;

/// Errors from the reference store implementations. The production
/// backing stores (a relational index plus a blob store) are an
/// external collaborator; this crate only specifies and exercises the
/// trait seam they'd sit behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("duplicate record: {0}")]
    Duplicate(String),
}
