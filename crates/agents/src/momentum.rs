//! Momentum trader: watches a rolling window of recent prices and
//! fires a market order in the direction of the trend once the
//! deviation crosses a threshold, subject to a position-scaled
//! cooldown, a position cap, and an anti-runaway size shrink once the
//! price has wandered far from its initial anchor.

use crate::error::AgentError;
use crate::state::{AgentAction, MarketState};
use crate::traits::Agent;
use common::{OrderType, Side};
use matching_engine::Trade;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumParams {
    pub lookback_period: usize,
    pub threshold: f64,
    pub cooldown_period_ticks: u32,
    pub max_position: i64,
    pub max_deviation: f64,
    pub order_size: u32,
}

impl MomentumParams {
    fn validate(&self, agent_id: &str) -> Result<(), AgentError> {
        if self.lookback_period < 2 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "lookback_period must be at least 2".into(),
            });
        }
        if self.threshold <= 0.0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "threshold must be positive".into(),
            });
        }
        if self.max_position <= 0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "max_position must be positive".into(),
            });
        }
        if self.max_deviation <= 0.0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "max_deviation must be positive".into(),
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

pub struct Momentum {
    id: String,
    params: MomentumParams,
    history: VecDeque<f64>,
    anchor_price: Option<f64>,
    cooldown_remaining: u32,
}

impl Momentum {
    pub fn new(id: impl Into<String>, params: MomentumParams) -> Result<Self, AgentError> {
        let id = id.into();
        params.validate(&id)?;
        Ok(Self {
            id,
            history: VecDeque::with_capacity(params.lookback_period),
            params,
            anchor_price: None,
            cooldown_remaining: 0,
        })
    }

    fn observe(&mut self, price: f64) {
        if self.anchor_price.is_none() {
            self.anchor_price = Some(price);
        }
        self.history.push_back(price);
        while self.history.len() > self.params.lookback_period {
            self.history.pop_front();
        }
    }

    fn deviation(&self) -> Option<f64> {
        if self.history.len() < self.params.lookback_period {
            return None;
        }
        let oldest = *self.history.front()?;
        let latest = *self.history.back()?;
        if oldest == 0.0 {
            return None;
        }
        Some((latest - oldest) / oldest)
    }
}

impl Agent for Momentum {
    fn id(&self) -> &str {
        &self.id
    }

    fn tick(&mut self, _timestamp: i64, state: &MarketState<'_>) -> Vec<AgentAction> {
        let Some(price) = state.last_trade_price.or(state.mid_price) else {
            return Vec::new();
        };
        self.observe(price);

        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
            return Vec::new();
        }

        let Some(deviation) = self.deviation() else {
            return Vec::new();
        };
        if deviation.abs() < self.params.threshold {
            return Vec::new();
        }

        let side = if deviation > 0.0 { Side::Buy } else { Side::Sell };
        let mut size = self.params.order_size;

        let anchor = self.anchor_price.unwrap_or(price);
        if anchor != 0.0 && ((price - anchor) / anchor).abs() > self.params.max_deviation {
            size = ((size as f64) * 0.25).floor() as u32;
            if size < 5 {
                return Vec::new();
            }
        }

        let room = match side {
            Side::Buy => (self.params.max_position - state.position).max(0),
            Side::Sell => (self.params.max_position + state.position).max(0),
        } as u32;
        size = size.min(room);
        if size == 0 {
            return Vec::new();
        }

        self.cooldown_remaining =
            self.params.cooldown_period_ticks + (state.position.unsigned_abs() / 50) as u32;

        vec![AgentAction::PlaceOrder {
            side,
            order_type: OrderType::Market,
            price: None,
            quantity: size,
            thought: None,
        }]
    }

    fn on_trade(&mut self, _trade: &Trade) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(last_trade_price: Option<f64>, mid: f64, position: i64) -> MarketState<'static> {
        MarketState {
            timestamp: 0,
            mid_price: Some(mid),
            spread: Some(1.0),
            best_bid: Some(mid - 0.5),
            best_ask: Some(mid + 0.5),
            last_trade_price,
            last_trade_quantity: None,
            recent_news: &[],
            position,
            cash: 0.0,
            open_orders: &[],
        }
    }

    fn params() -> MomentumParams {
        MomentumParams {
            lookback_period: 3,
            threshold: 0.02,
            cooldown_period_ticks: 2,
            max_position: 100,
            max_deviation: 0.5,
            order_size: 20,
        }
    }

    #[test]
    fn stays_silent_until_window_is_full() {
        let mut agent = Momentum::new("m1", params()).unwrap();
        for p in [100.0, 101.0] {
            let state = state_with(Some(p), p, 0);
            assert!(agent.tick(0, &state).is_empty());
        }
    }

    #[test]
    fn fires_buy_on_upward_breakout() {
        let mut agent = Momentum::new("m1", params()).unwrap();
        let prices = [100.0, 100.0, 110.0];
        let mut last = Vec::new();
        for p in prices {
            let state = state_with(Some(p), p, 0);
            last = agent.tick(0, &state);
        }
        assert_eq!(last.len(), 1);
        match &last[0] {
            AgentAction::PlaceOrder { side, order_type, quantity, .. } => {
                assert_eq!(*side, Side::Buy);
                assert_eq!(*order_type, OrderType::Market);
                assert_eq!(*quantity, 20);
            }
            _ => panic!("expected a place order action"),
        }
    }

    #[test]
    fn enters_cooldown_scaled_by_position_after_firing() {
        let mut agent = Momentum::new("m1", params()).unwrap();
        let prices = [100.0, 100.0, 110.0, 110.0];
        let mut actions = Vec::new();
        for p in prices {
            let state = state_with(Some(p), p, 120);
            actions.push(agent.tick(0, &state));
        }
        assert!(!actions[2].is_empty());
        assert!(actions[3].is_empty());
        // cooldown = 2 + floor(120/50) = 4, so it should still be silent a few ticks later
        for _ in 0..2 {
            let state = state_with(Some(110.0), 110.0, 120);
            assert!(agent.tick(0, &state).is_empty());
        }
    }

    #[test]
    fn shrinks_size_far_from_anchor_and_skips_if_too_small() {
        let mut p = params();
        p.order_size = 16;
        p.max_deviation = 0.05;
        let mut agent = Momentum::new("m1", p).unwrap();
        let prices = [100.0, 100.0, 200.0];
        let mut last = Vec::new();
        for price in prices {
            let state = state_with(Some(price), price, 0);
            last = agent.tick(0, &state);
        }
        // deviation from anchor (100 -> 200) is 100% > 5% max_deviation, shrinks to 25% of 16 = 4 < 5
        assert!(last.is_empty());
    }

    #[test]
    fn rejects_invalid_threshold() {
        let mut p = params();
        p.threshold = 0.0;
        assert!(Momentum::new("m1", p).is_err());
    }
}
