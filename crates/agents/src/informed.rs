//! Informed trader: reacts once to each piece of material news with an
//! aggressive market order sized by its reaction strength and the
//! news's magnitude, moving its position toward the news-implied
//! extreme (covering a short before going long, or closing a long
//! before going short) without overshooting `max_position`.

use crate::error::AgentError;
use crate::state::{AgentAction, MarketState};
use crate::traits::Agent;
use common::{OrderType, Side};
use matching_engine::Trade;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tape::{Magnitude, Sentiment};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InformedParams {
    pub reaction_strength: f64,
    pub order_size: u32,
    pub max_position: i64,
}

impl InformedParams {
    fn validate(&self, agent_id: &str) -> Result<(), AgentError> {
        if self.reaction_strength <= 0.0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "reaction_strength must be positive".into(),
            });
        }
        if self.order_size == 0 {
            return Err(AgentError::InvalidParams {
                agent_id: agent_id.to_string(),
                reason: "order_size must be positive".into(),
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
        Magnitude::Low => 0.5,
        Magnitude::Medium => 1.0,
        Magnitude::High => 2.0,
    }
}

pub struct Informed {
    id: String,
    params: InformedParams,
    seen: HashSet<String>,
}

impl Informed {
    pub fn new(id: impl Into<String>, params: InformedParams) -> Result<Self, AgentError> {
        let id = id.into();
        params.validate(&id)?;
        Ok(Self {
            id,
            params,
            seen: HashSet::new(),
        })
    }
}

impl Agent for Informed {
    fn id(&self) -> &str {
        &self.id
    }

    fn tick(&mut self, _timestamp: i64, state: &MarketState<'_>) -> Vec<AgentAction> {
        let mut actions = Vec::new();

        for news in state.recent_news {
            if self.seen.contains(&news.id) {
                continue;
            }
            self.seen.insert(news.id.clone());

            if !news.sentiment.is_material() {
                continue;
            }

            // Positive sentiment drives the target toward +max_position
            // (covering any short first); negative drives it toward
            // -max_position (closing any long first).
            let (side, target) = match news.sentiment {
                Sentiment::Positive => (Side::Buy, self.params.max_position),
                Sentiment::Negative => (Side::Sell, -self.params.max_position),
                Sentiment::Neutral => continue,
            };

            let room = (target - state.position).unsigned_abs();
            if room == 0 {
                continue;
            }

            let reaction_size = (self.params.order_size as f64
                * self.params.reaction_strength
                * magnitude_multiplier(news.magnitude))
            .round() as u32;
            let size = reaction_size.min(room as u32);
            if size == 0 {
                continue;
            }

            actions.push(AgentAction::PlaceOrder {
                side,
                order_type: OrderType::Market,
                price: None,
                quantity: size,
                thought: Some(format!("reacting to: {}", news.headline)),
            });
        }

        actions
    }

    fn on_trade(&mut self, _trade: &Trade) {}
}
