//! The common contract every archetype implements.

use crate::state::{AgentAction, MarketState};
use matching_engine::Trade;

/// A market participant. Every archetype owns its own RNG stream
/// (derived from the master RNG at construction) and its own
/// position/cash bookkeeping; the Runner is the sole mutator of shared
/// market state.
pub trait Agent {
    fn id(&self) -> &str;

    /// Called once per tick with the shared market view augmented with
    /// this agent's own position/cash/open orders. Returns zero or
    /// more actions for the Runner to execute, in order.
    fn tick(&mut self, timestamp: i64, state: &MarketState<'_>) -> Vec<AgentAction>;

    /// Called once per trade, for every agent, regardless of whether
    /// it was a counterparty — archetypes ignore trades that don't
    /// name their own id.
    fn on_trade(&mut self, trade: &Trade);
}
