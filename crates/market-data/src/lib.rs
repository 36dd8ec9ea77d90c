//! Aggregation passes for the exchange simulator: OHLCV bars and
//! depth-limited book snapshots.
//!
//! # Modules
//!
//! - [`ohlcv`] - single-current-bar-per-resolution accumulator, plus
//!   downstream bucket-aggregation to derive coarser resolutions
//! - [`snapshot`] - timestamped, session-keyed book snapshots built
//!   from a live [`matching_engine::MatchingEngine`]
//! - [`error`] - construction-time error cases

pub mod error;
pub mod ohlcv;
pub mod snapshot;

pub use error::MarketDataError;
pub use ohlcv::{rebucket, OhlcvBar, OhlcvBuilder};
pub use snapshot::{build_snapshot, TimestampedSnapshot};

/// Result type for market data operations
pub type Result<T> = std::result::Result<T, MarketDataError>;
