//! Noise trader: submits a random-direction limit order around mid
//! price with fixed probability and size each tick.

use crate::error::AgentError;
use crate::state::{AgentAction, MarketState};
use crate::traits::Agent;
use common::{OrderType, Rng, Side};
use matching_engine::Trade;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseParams {
    pub order_probability: f64,
    pub price_range: f64,
    pub order_size: u32,
}

impl NoiseParams {
    fn validate(&self, agent_id: &str) -> Result<(), AgentError> {
        if !(0.0..=1.0).contains(&self.order_probability) {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "order_probability must be in [0, 1]".into(),
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

pub struct NoiseTrader {
    id: String,
    params: NoiseParams,
    rng: Rng,
}

impl NoiseTrader {
    pub fn new(id: impl Into<String>, params: NoiseParams, rng: Rng) -> Result<Self, AgentError> {
        let id = id.into();
        params.validate(&id)?;
        Ok(Self { id, params, rng })
    }
}

impl Agent for NoiseTrader {
    fn id(&self) -> &str {
        &self.id
    }

    fn tick(&mut self, _timestamp: i64, state: &MarketState<'_>) -> Vec<AgentAction> {
        if self.rng.next_f64() >= self.params.order_probability {
            return Vec::new();
        }
        let Some(mid) = state.mid_price else {
            return Vec::new();
        };

        let side = if self.rng.next_f64() < 0.5 { Side::Buy } else { Side::Sell };
        let offset = self.rng.next_range_f64(-self.params.price_range, self.params.price_range);
        let price = ((mid + offset).max(1.0) * 100.0).round() / 100.0;

        vec![AgentAction::PlaceOrder {
            side,
            order_type: OrderType::Limit,
            price: Some(price),
            quantity: self.params.order_size,
            thought: None,
        }]
    }

    fn on_trade(&mut self, _trade: &Trade) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_acts_with_zero_probability() {
        let params = NoiseParams {
            order_probability: 0.0,
            price_range: 1.0,
            order_size: 10,
        };
        let mut trader = NoiseTrader::new("n1", params, Rng::new(1)).unwrap();
        let state = MarketState {
            timestamp: 0,
            mid_price: Some(100.0),
            spread: Some(1.0),
            best_bid: Some(99.5),
            best_ask: Some(100.5),
            last_trade_price: None,
            last_trade_quantity: None,
            recent_news: &[],
            position: 0,
            cash: 0.0,
            open_orders: &[],
        };
        for _ in 0..20 {
            assert!(trader.tick(0, &state).is_empty());
        }
    }

    #[test]
    fn price_is_clamped_to_at_least_one() {
        let params = NoiseParams {
            order_probability: 1.0,
            price_range: 1000.0,
            order_size: 5,
        };
        let mut trader = NoiseTrader::new("n1", params, Rng::new(7)).unwrap();
        let state = MarketState {
            timestamp: 0,
            mid_price: Some(0.1),
            spread: Some(0.1),
            best_bid: Some(0.05),
            best_ask: Some(0.15),
            last_trade_price: None,
            last_trade_quantity: None,
            recent_news: &[],
            position: 0,
            cash: 0.0,
            open_orders: &[],
        };
        for _ in 0..20 {
            for action in trader.tick(0, &state) {
                if let AgentAction::PlaceOrder { price: Some(p), .. } = action {
                    assert!(p >= 1.0);
                }
            }
        }
    }

    #[test]
    fn rejects_invalid_probability() {
        let params = NoiseParams {
            order_probability: 1.5,
            price_range: 1.0,
            order_size: 10,
        };
        assert!(NoiseTrader::new("n1", params, Rng::new(1)).is_err());
    }
}
