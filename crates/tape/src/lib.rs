//! Append-only, sequenced event tape for one simulation session.
//!
//! # Modules
//!
//! - [`event`] - the `TapeEvent` sum type and the news-redaction split
//!   between `NewsEvent` (in-memory) and `PersistedNewsEvent` (tape)
//! - [`writer`] - the durable, sequence-assigning writer
//! - [`error`] - I/O and serialization failures

pub mod error;
pub mod event;
pub mod writer;

pub use error::TapeError;
pub use event::{AgentThoughtEvent, Magnitude, NewsEvent, PersistedNewsEvent, Sentiment, TapeEvent};
pub use writer::TapeWriter;
