//! Market data error types

use thiserror::Error;

/// Errors that can occur while building OHLCV bars or snapshots.
/// Aggregation itself never fails on in-memory state; these are
/// construction-time misconfigurations only.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// A resolution or interval was not a positive number of milliseconds
    #[error("invalid interval: {0}")]
    InvalidInterval(String),
}

/// Result type for market data operations
pub type Result<T> = std::result::Result<T, MarketDataError>;
