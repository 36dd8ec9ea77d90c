//! Matching engine error types

use thiserror::Error;

/// Errors that can occur during order placement. These are all
/// programmer errors — malformed requests the Runner rejects before
/// any tape event is emitted — not market conditions.
#[derive(Error, Debug)]
pub enum MatchingError {
    /// Order quantity must be positive
    #[error("order quantity must be positive, got {0}")]
    NonPositiveQuantity(u32),

    /// Limit order price must be positive
    #[error("limit order price must be positive, got {0}")]
    NonPositivePrice(f64),

    /// Market orders must not carry an explicit price
    #[error("market orders cannot carry a price")]
    MarketOrderWithPrice,
}
