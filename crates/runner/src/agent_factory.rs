//! Constructs a boxed [`Agent`] from a config-supplied archetype name
//! and a derived RNG child. Must agree with `config::KNOWN_ARCHETYPES`.

use crate::error::RunnerError;
use agents::{
    Agent, AgentError, Fundamentals, FundamentalsParams, Informed, InformedParams, MarketMaker,
    MarketMakerParams, Momentum, MomentumParams, NoiseParams, NoiseTrader,
};
use common::Rng;
use config::AgentConfig;

fn parse<T: serde::de::DeserializeOwned>(agent: &AgentConfig) -> Result<T, RunnerError> {
    serde_json::from_value(agent.params.clone()).map_err(|source| RunnerError::AgentParams {
        agent_id: agent.id.clone(),
        source,
    })
}

fn construction_error(agent_id: &str, source: AgentError) -> RunnerError {
    RunnerError::AgentConstruction {
        agent_id: agent_id.to_string(),
        source,
    }
}

/// Build one archetype instance, consuming a single derived RNG child
/// regardless of whether the archetype actually uses randomness — the
/// draw still has to happen so later agents' derived streams don't
/// shift when an archetype that ignores RNG is added or removed.
pub fn build_agent(agent: &AgentConfig, rng: Rng) -> Result<Box<dyn Agent>, RunnerError> {
    match agent.archetype.as_str() {
        "noise" => {
            let params: NoiseParams = parse(agent)?;
            let trader = NoiseTrader::new(agent.id.clone(), params, rng)
                .map_err(|e| construction_error(&agent.id, e))?;
            Ok(Box::new(trader))
        }
        "market_maker" => {
            let params: MarketMakerParams = parse(agent)?;
            let trader = MarketMaker::new(agent.id.clone(), params)
                .map_err(|e| construction_error(&agent.id, e))?;
            Ok(Box::new(trader))
        }
        "momentum" => {
            let params: MomentumParams = parse(agent)?;
            let trader = Momentum::new(agent.id.clone(), params)
                .map_err(|e| construction_error(&agent.id, e))?;
            Ok(Box::new(trader))
        }
        "informed" => {
            let params: InformedParams = parse(agent)?;
            let trader = Informed::new(agent.id.clone(), params)
                .map_err(|e| construction_error(&agent.id, e))?;
            Ok(Box::new(trader))
        }
        "fundamentals" => {
            let params: FundamentalsParams = parse(agent)?;
            let trader = Fundamentals::new(agent.id.clone(), params, rng)
                .map_err(|e| construction_error(&agent.id, e))?;
            Ok(Box::new(trader))
        }
        other => Err(construction_error(
            &agent.id,
            AgentError::InvalidParams {
                agent_id: agent.id.clone(),
                reason: format!("unknown archetype '{other}'"),
            },
        )),
    }
}
