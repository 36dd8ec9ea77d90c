//! Fundamentals trader: evolves a private fair-value estimate by
//! periodic drift and random shocks, absorbs material news after a
//! reaction lag with a magnitude-scaled jump (high-magnitude news also
//! injecting a small persistent drift that decays each update), and
//! quotes a mean-reverting limit order once price and fair value
//! diverge past a threshold.

use crate::error::AgentError;
use crate::state::{AgentAction, MarketState};
use crate::traits::Agent;
use common::{OrderType, Rng, Side};
use matching_engine::Trade;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use tape::{Magnitude, Sentiment};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalsParams {
    pub drift_per_tick: f64,
    pub volatility_per_tick: f64,
    pub drift_update_interval_ms: i64,
    pub reaction_lag_ms: i64,
    pub news_drift_decay: f64,
    pub deviation_threshold: f64,
    pub base_order_size: u32,
    pub max_position: i64,
}

impl FundamentalsParams {
    fn validate(&self, agent_id: &str) -> Result<(), AgentError> {
        if self.volatility_per_tick < 0.0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "volatility_per_tick must not be negative".into(),
            });
        }
        if self.drift_update_interval_ms <= 0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "drift_update_interval_ms must be positive".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.news_drift_decay) {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "news_drift_decay must be in [0, 1]".into(),
            });
        }
        if self.deviation_threshold <= 0.0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "deviation_threshold must be positive".into(),
            });
        }
        if self.base_order_size == 0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "base_order_size must be positive".into(),
            });
        }
        if self.max_position <= 0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "max_position must be positive".into(),
            });
        }
        Ok(())
    }
}

fn magnitude_multiplier(magnitude: Magnitude) -> f64 {
    match magnitude {
        Magnitude::Low => 0.02,
        Magnitude::Medium => 0.04,
        Magnitude::High => 0.08,
    }
}

const HIGH_MAGNITUDE_PERSISTENT_SHOCK: f64 = 0.0005;

struct PendingReaction {
    ready_at: i64,
    fraction: f64,
    high_magnitude: bool,
}

pub struct Fundamentals {
    id: String,
    params: FundamentalsParams,
    rng: Rng,
    fair_value: Option<f64>,
    /// News-induced additive drift, injected by high-magnitude reactions
    /// and decayed by `news_drift_decay` on every periodic update.
    shock: f64,
    last_drift_update: Option<i64>,
    pending: VecDeque<PendingReaction>,
    seen_news: HashSet<String>,
}

impl Fundamentals {
    pub fn new(id: impl Into<String>, params: FundamentalsParams, rng: Rng) -> Result<Self, AgentError> {
        let id = id.into();
        params.validate(&id)?;
        Ok(Self {
            id,
            params,
            rng,
            fair_value: None,
            shock: 0.0,
            last_drift_update: None,
            pending: VecDeque::new(),
            seen_news: HashSet::new(),
        })
    }

    pub fn fair_value(&self) -> Option<f64> {
        self.fair_value
    }

    fn queue_news_reactions(&mut self, timestamp: i64, state: &MarketState<'_>) {
        for news in state.recent_news {
            if self.seen_news.contains(&news.id) {
                continue;
            }
            self.seen_news.insert(news.id.clone());
            if !news.sentiment.is_material() {
                continue;
            }
            let sign = match news.sentiment {
                Sentiment::Positive => 1.0,
                Sentiment::Negative => -1.0,
                Sentiment::Neutral => continue,
            };
            self.pending.push_back(PendingReaction {
                ready_at: news.timestamp + self.params.reaction_lag_ms,
                fraction: sign * magnitude_multiplier(news.magnitude),
                high_magnitude: matches!(news.magnitude, Magnitude::High),
            });
            // queued by timestamp order since recent_news arrives in
            // chronological order within the trailing window
            let _ = timestamp;
        }
    }

    fn apply_ready_reactions(&mut self, timestamp: i64) {
        let mut remaining = VecDeque::with_capacity(self.pending.len());
        while let Some(reaction) = self.pending.pop_front() {
            if reaction.ready_at <= timestamp {
                if let Some(fv) = self.fair_value.as_mut() {
                    *fv = (*fv * (1.0 + reaction.fraction)).max(0.01);
                }
                if reaction.high_magnitude {
                    self.shock += reaction.fraction.signum() * HIGH_MAGNITUDE_PERSISTENT_SHOCK;
                }
            } else {
                remaining.push_back(reaction);
            }
        }
        self.pending = remaining;
    }

    fn maybe_evolve(&mut self, timestamp: i64) {
        let Some(fv) = self.fair_value else { return };
        let due = match self.last_drift_update {
            None => true,
            Some(last) => timestamp - last >= self.params.drift_update_interval_ms,
        };
        if !due {
            return;
        }
        let noise = self.rng.next_range_f64(-1.0, 1.0) * self.params.volatility_per_tick;
        let new_fv = fv * (1.0 + self.params.drift_per_tick + self.shock + noise);
        self.fair_value = Some(new_fv.max(0.01));
        self.shock *= 1.0 - self.params.news_drift_decay;
        self.last_drift_update = Some(timestamp);
    }
}

impl Agent for Fundamentals {
    fn id(&self) -> &str {
        &self.id
    }

    fn tick(&mut self, timestamp: i64, state: &MarketState<'_>) -> Vec<AgentAction> {
        if self.fair_value.is_none() {
            self.fair_value = state.last_trade_price.or(state.mid_price);
        }

        self.queue_news_reactions(timestamp, state);
        self.apply_ready_reactions(timestamp);
        self.maybe_evolve(timestamp);

        let (Some(fair_value), Some(price)) = (self.fair_value, state.mid_price) else {
            return Vec::new();
        };
        if fair_value <= 0.0 {
            return Vec::new();
        }

        let deviation = (price - fair_value) / fair_value;
        if deviation.abs() < self.params.deviation_threshold {
            return Vec::new();
        }

        // Mean-reverting side: price above fair value sells it back down,
        // price below fair value buys it back up.
        let side = if deviation > 0.0 { Side::Sell } else { Side::Buy };
        let order_price = match side {
            Side::Sell => price + 0.5,
            Side::Buy => price - 0.5,
        };
        if order_price <= 0.0 {
            return Vec::new();
        }

        let leverage = (deviation.abs() / self.params.deviation_threshold).min(3.0);
        let desired = (self.params.base_order_size as f64 * leverage).round() as u32;

        let room = match side {
            Side::Buy => (self.params.max_position - state.position).max(0),
            Side::Sell => (self.params.max_position + state.position).max(0),
        } as u32;
        let size = desired.min(room);
        if size == 0 {
            return Vec::new();
        }

        vec![AgentAction::PlaceOrder {
            side,
            order_type: OrderType::Limit,
            price: Some(order_price),
            quantity: size,
            thought: None,
        }]
    }

    fn on_trade(&mut self, _trade: &Trade) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tape::NewsEvent;

    fn params() -> FundamentalsParams {
        FundamentalsParams {
            drift_per_tick: 0.0,
            volatility_per_tick: 0.0,
            drift_update_interval_ms: 1000,
            reaction_lag_ms: 200,
            news_drift_decay: 0.5,
            deviation_threshold: 0.05,
            base_order_size: 10,
            max_position: 100,
        }
    }

    fn state(mid: f64, position: i64, news: &[NewsEvent]) -> MarketState<'_> {
        MarketState {
            timestamp: 0,
            mid_price: Some(mid),
            spread: Some(1.0),
            best_bid: Some(mid - 0.5),
            best_ask: Some(mid + 0.5),
            last_trade_price: None,
            last_trade_quantity: None,
            recent_news: news,
            position,
            cash: 0.0,
            open_orders: &[],
        }
    }

    #[test]
    fn initializes_fair_value_from_first_observed_price() {
        let mut agent = Fundamentals::new("f1", params(), Rng::new(1)).unwrap();
        assert!(agent.fair_value().is_none());
        agent.tick(0, &state(100.0, 0, &[]));
        assert_eq!(agent.fair_value(), Some(100.0));
    }

    #[test]
    fn stays_silent_when_within_deviation_threshold() {
        let mut agent = Fundamentals::new("f1", params(), Rng::new(1)).unwrap();
        assert!(agent.tick(0, &state(100.0, 0, &[])).is_empty());
        assert!(agent.tick(100, &state(102.0, 0, &[])).is_empty());
    }

    #[test]
    fn quotes_mean_reverting_sell_when_price_above_fair_value() {
        let mut agent = Fundamentals::new("f1", params(), Rng::new(1)).unwrap();
        agent.tick(0, &state(100.0, 0, &[]));
        let actions = agent.tick(100, &state(110.0, 0, &[]));
        assert_eq!(actions.len(), 1);
        match &actions[0] {
            AgentAction::PlaceOrder { side, order_type, price, .. } => {
                assert_eq!(*side, Side::Sell);
                assert_eq!(*order_type, OrderType::Limit);
                assert_eq!(*price, Some(110.5));
            }
            _ => panic!("expected place order"),
        }
    }

    #[test]
    fn news_jump_applies_after_reaction_lag_and_injects_persistent_shock() {
        let mut agent = Fundamentals::new("f1", params(), Rng::new(1)).unwrap();
        agent.tick(0, &state(100.0, 0, &[]));
        let before = agent.fair_value().unwrap();

        let news = vec![NewsEvent {
            id: "news-1".into(),
            timestamp: 100,
            headline: "huge news".into(),
            content: "...".into(),
            sentiment: Sentiment::Positive,
            magnitude: Magnitude::High,
            source: "wire".into(),
        }];
        // lag is 200ms; at t=150 (before ready_at=300) nothing changes.
        agent.tick(150, &state(100.0, 0, &news));
        assert_eq!(agent.fair_value().unwrap(), before);

        // at t=300 the jump applies: fair_value *= 1.08
        agent.tick(300, &state(100.0, 0, &[]));
        assert!((agent.fair_value().unwrap() - before * 1.08).abs() < 1e-9);
    }

    #[test]
    fn size_scales_with_deviation_and_respects_max_position() {
        let mut p = params();
        p.max_position = 5;
        let mut agent = Fundamentals::new("f1", p, Rng::new(1)).unwrap();
        agent.tick(0, &state(100.0, 0, &[]));
        // deviation is far beyond threshold -> leverage caps at 3x but
        // room caps the order at max_position.
        let actions = agent.tick(100, &state(50.0, 0, &[]));
        match &actions[0] {
            AgentAction::PlaceOrder { quantity, .. } => assert_eq!(*quantity, 5),
            _ => panic!("expected place order"),
        }
    }

    #[test]
    fn rejects_invalid_news_drift_decay() {
        let mut p = params();
        p.news_drift_decay = 2.0;
        assert!(Fundamentals::new("f1", p, Rng::new(1)).is_err());
    }
}
