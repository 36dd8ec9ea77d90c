//! Trait seams and in-memory reference implementations for the
//! external tape index, OHLCV store, snapshot store, and session
//! store. The production backing stores (a
//! relational index plus a blob store) are explicitly out of core
//! scope; this crate specifies the interface they sit behind and
//! supplies an in-memory implementation good enough for the CLI and
//! for tests.
//!
//! # Modules
//!
//! - [`session`] - the `Session` record and its status state machine
//! - [`traits`] - `TapeIndexStore`/`OhlcvStore`/`SnapshotStore`/`SessionStore`
//! - [`memory`] - in-memory implementations of all four
//! - [`error`] - `StorageError`

pub mod error;
pub mod memory;
pub mod session;
pub mod traits;

pub use error::StorageError;
pub use memory::{InMemoryOhlcvStore, InMemorySessionStore, InMemorySnapshotStore, InMemoryTapeIndex};
pub use session::{SessionRecord, SessionStatus};
pub use traits::{OhlcvStore, Result, SessionStore, SnapshotStore, TapeIndexRow, TapeIndexStore};
