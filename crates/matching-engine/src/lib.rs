//! Order matching engine for the single-instrument exchange simulator.
//!
//! # Architecture
//!
//! The engine is a thin, sink-notifying wrapper around a price-time
//! priority order book: `(old_state, request) -> (new_state, trades)`.
//! Given the same sequence of requests it always produces the same
//! sequence of trades — this is the determinism the rest of the system
//! relies on.
//!
//! ## Core Components
//!
//! - [`domain`] - Order, PriceLevel, OrderBook, Trade, OrderBookSnapshot
//! - [`engine`] - the matching algorithm and its public operations
//! - [`event`] - events pushed through the caller-supplied sink
//! - [`result`] - return types for placement and cancellation
//! - [`error`] - programmer-error cases rejected at placement

pub mod domain;
pub mod engine;
pub mod error;
pub mod event;
pub mod result;

pub use domain::{BookLevel, Order, OrderBook, OrderBookSnapshot, PriceLevel, Trade};
pub use engine::{MatchingEngine, PlaceOrderRequest};
pub use error::MatchingError;
pub use event::MatchingEvent;
pub use result::{CancelResult, MatchResult};
