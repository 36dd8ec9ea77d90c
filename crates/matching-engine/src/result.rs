//! Result types returned by the engine's public operations.

use crate::domain::{Order, Trade};

/// Result of placing an order.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub order: Order,
    pub trades: Vec<Trade>,
}

impl MatchResult {
    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }

    pub fn filled_quantity(&self) -> u32 {
        self.trades.iter().map(|t| t.quantity).sum()
    }
}

/// Result of cancelling an order: `None` if the order was absent,
/// already filled, or already cancelled.
pub type CancelResult = Option<Order>;
