//! Market maker: cancels its own resting orders every tick and
//! re-quotes a symmetric bid/ask around mid price, skewed by its
//! current inventory.

use crate::error::AgentError;
use crate::state::{AgentAction, MarketState};
use crate::traits::Agent;
use common::{OrderType, Side};
use matching_engine::Trade;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketMakerParams {
    pub quote_spread: f64,
    pub inventory_skew: f64,
    pub max_position: i64,
    pub order_size: u32,
}

impl MarketMakerParams {
    fn validate(&self, agent_id: &str) -> Result<(), AgentError> {
        if self.quote_spread <= 0.0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "quote_spread must be positive".into(),
            });
        }
        if self.max_position <= 0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "max_position must be positive".into(),
            });
        }
        if self.order_size == 0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "order_size must be positive".into(),
            });
        }
        Ok(())
    }
}

pub struct MarketMaker {
    id: String,
    params: MarketMakerParams,
}

impl MarketMaker {
    pub fn new(id: impl Into<String>, params: MarketMakerParams) -> Result<Self, AgentError> {
        let id = id.into();
        params.validate(&id)?;
        Ok(Self { id, params })
    }
}

impl Agent for MarketMaker {
    fn id(&self) -> &str {
        &self.id
    }

    fn tick(&mut self, _timestamp: i64, state: &MarketState<'_>) -> Vec<AgentAction> {
        let mut actions: Vec<AgentAction> = state
            .open_orders
            .iter()
            .map(|o| AgentAction::CancelOrder {
                order_id: o.id,
                thought: None,
            })
            .collect();

        let Some(mid) = state.mid_price else {
            return actions;
        };

        let skew = -(state.position as f64) * self.params.inventory_skew;
        let half_spread = self.params.quote_spread / 2.0;
        let bid_price = mid - half_spread + skew;
        let ask_price = mid + half_spread + skew;

        let room_to_buy = (self.params.max_position - state.position).max(0) as u32;
        let room_to_sell = (self.params.max_position + state.position).max(0) as u32;

        let bid_size = self.params.order_size.min(room_to_buy);
        let ask_size = self.params.order_size.min(room_to_sell);

        if bid_size > 0 && bid_price > 0.0 {
            actions.push(AgentAction::PlaceOrder {
                side: Side::Buy,
                order_type: OrderType::Limit,
                price: Some(bid_price),
                quantity: bid_size,
                thought: None,
            });
        }
        if ask_size > 0 && ask_price > 0.0 {
            actions.push(AgentAction::PlaceOrder {
                side: Side::Sell,
                order_type: OrderType::Limit,
                price: Some(ask_price),
                quantity: ask_size,
                thought: None,
            });
        }

        actions
    }

    fn on_trade(&mut self, _trade: &Trade) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_state<'a>(mid: f64, position: i64, open_orders: &'a [matching_engine::Order]) -> MarketState<'a> {
        MarketState {
            timestamp: 0,
            mid_price: Some(mid),
            spread: Some(1.0),
            best_bid: Some(mid - 0.5),
            best_ask: Some(mid + 0.5),
            last_trade_price: None,
            last_trade_quantity: None,
            recent_news: &[],
            position,
            cash: 0.0,
            open_orders,
        }
    }

    #[test]
    fn quotes_symmetric_around_mid_when_flat() {
        let params = MarketMakerParams {
            quote_spread: 2.0,
            inventory_skew: 0.01,
            max_position: 100,
            order_size: 10,
        };
        let mut mm = MarketMaker::new("mm1", params).unwrap();
        let state = base_state(100.0, 0, &[]);
        let actions = mm.tick(0, &state);
        let prices: Vec<(Side, f64)> = actions
            .iter()
            .filter_map(|a| match a {
                AgentAction::PlaceOrder { side, price: Some(p), .. } => Some((*side, *p)),
                _ => None,
            })
            .collect();
        assert_eq!(prices.len(), 2);
        let bid = prices.iter().find(|(s, _)| *s == Side::Buy).unwrap().1;
        let ask = prices.iter().find(|(s, _)| *s == Side::Sell).unwrap().1;
        assert_eq!(bid, 99.0);
        assert_eq!(ask, 101.0);
    }

    #[test]
    fn skews_quotes_away_from_inventory() {
        let params = MarketMakerParams {
            quote_spread: 2.0,
            inventory_skew: 0.1,
            max_position: 100,
            order_size: 10,
        };
        let mut mm = MarketMaker::new("mm1", params).unwrap();
        let state = base_state(100.0, 50, &[]);
        let actions = mm.tick(0, &state);
        let bid = actions
            .iter()
            .find_map(|a| match a {
                AgentAction::PlaceOrder { side: Side::Buy, price: Some(p), .. } => Some(*p),
                _ => None,
            })
            .unwrap();
        // long inventory should shift quotes down
        assert!(bid < 99.0);
    }

    #[test]
    fn cancels_all_resident_orders_every_tick() {
        use common::{OrderId, OrderStatus, OrderType as OT, Side as S};
        let params = MarketMakerParams {
            quote_spread: 2.0,
            inventory_skew: 0.0,
            max_position: 100,
            order_size: 10,
        };
        let mut mm = MarketMaker::new("mm1", params).unwrap();
        let resident = matching_engine::Order {
            id: OrderId::new(1),
            agent_id: "mm1".into(),
            side: S::Buy,
            order_type: OT::Limit,
            price: Some(99.0),
            quantity: 10,
            filled_quantity: 0,
            status: OrderStatus::Open,
            timestamp: 0,
            sequence: 1,
        };
        let orders = vec![resident.clone()];
        let state = base_state(100.0, 0, &orders);
        let actions = mm.tick(0, &state);
        assert!(actions.iter().any(|a| matches!(a, AgentAction::CancelOrder { order_id, .. } if *order_id == resident.id)));
    }

    #[test]
    fn size_truncated_at_max_position() {
        let params = MarketMakerParams {
            quote_spread: 2.0,
            inventory_skew: 0.0,
            max_position: 5,
            order_size: 10,
        };
        let mut mm = MarketMaker::new("mm1", params).unwrap();
        let state = base_state(100.0, 3, &[]);
        let actions = mm.tick(0, &state);
        let bid_size = actions
            .iter()
            .find_map(|a| match a {
                AgentAction::PlaceOrder { side: Side::Buy, quantity, .. } => Some(*quantity),
                _ => None,
            })
            .unwrap();
        assert_eq!(bid_size, 2); // room to buy = 5 - 3
    }
}
