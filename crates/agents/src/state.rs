//! The read-only market view agents tick against, and the actions they
//! can hand back.

use common::{OrderId, OrderType, Side};
use matching_engine::{Order, Trade};
use serde::{Deserialize, Serialize};
use tape::NewsEvent;

/// What an archetype sees on a given tick. Built fresh by the Runner
/// every tick; `open_orders` and `position`/`cash` are specific to the
/// agent being ticked even though the rest is shared across all
/// agents that tick this round.
pub struct MarketState<'a> {
    pub timestamp: i64,
    pub mid_price: Option<f64>,
    pub spread: Option<f64>,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    pub last_trade_price: Option<f64>,
    pub last_trade_quantity: Option<u32>,
    /// News within the trailing 5-second window, sentiment included.
    pub recent_news: &'a [NewsEvent],
    pub position: i64,
    pub cash: f64,
    pub open_orders: &'a [Order],
}

/// An action an agent asks the Runner to execute on its behalf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentAction {
    PlaceOrder {
        side: Side,
        order_type: OrderType,
        price: Option<f64>,
        quantity: u32,
        thought: Option<String>,
    },
    CancelOrder {
        order_id: OrderId,
        thought: Option<String>,
    },
}

/// Position/cash bookkeeping shared by every archetype. An agent's
/// position and cash change only when it is a counterparty to a
/// trade; the Runner notifies every agent of every trade; each agent
/// ignores trades it wasn't party to.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wallet {
    pub position: i64,
    pub cash: f64,
}

impl Wallet {
    pub fn apply_trade(&mut self, agent_id: &str, trade: &Trade) {
        if trade.buy_agent_id == agent_id {
            self.position += trade.quantity as i64;
            self.cash -= trade.price * trade.quantity as f64;
        } else if trade.sell_agent_id == agent_id {
            self.position -= trade.quantity as i64;
            self.cash += trade.price * trade.quantity as f64;
        }
    }
}
