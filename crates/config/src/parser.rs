use crate::{AgentConfig, SimulationConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Load a [`SimulationConfig`] from a YAML file, substituting
/// `${VAR}` / `$VAR` environment references before parsing.
#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimulationConfig> {
    let path = path.as_ref();
    info!("loading session configuration from {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {:?}", path))?;

    debug!(bytes = content.len(), "read config file");

    let substituted = crate::substitution::substitute_env_vars(&content)?;

    let config: SimulationConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "failed to parse YAML session configuration")?;

    info!(agents = config.agents.len(), "session configuration loaded");
    Ok(config)
}

/// Write a [`SimulationConfig`] to a YAML file.
#[instrument(skip(config, path))]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &SimulationConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("saving session configuration to {:?}", path);

    let yaml = serde_yaml::to_string(config).with_context(|| "failed to serialize session configuration")?;
    fs::write(path, yaml).with_context(|| format!("failed to write config file: {:?}", path))?;

    info!("session configuration saved");
    Ok(())
}

/// A reasonable starting configuration for `simforge init`: one
/// market-maker and one noise trader, no scheduled news, a five-second
/// session.
#[instrument]
pub fn generate_default_config() -> SimulationConfig {
    SimulationConfig {
        seed: 42,
        duration_ms: 5_000,
        tick_size: 0.01,
        initial_price: 100.0,
        tick_interval_ms: crate::default_tick_interval_ms(),
        snapshot_interval_ms: crate::default_snapshot_interval_ms(),
        ohlcv_resolution_ms: crate::default_ohlcv_resolution_ms(),
        snapshot_depth: crate::default_snapshot_depth(),
        agents: vec![
            AgentConfig {
                id: "mm-1".to_string(),
                name: "Market Maker".to_string(),
                archetype: "market_maker".to_string(),
                params: serde_json::json!({
                    "quote_spread": 0.1,
                    "inventory_skew": 0.001,
                    "max_position": 500,
                    "order_size": 10,
                }),
            },
            AgentConfig {
                id: "noise-1".to_string(),
                name: "Noise Trader".to_string(),
                archetype: "noise".to_string(),
                params: serde_json::json!({
                    "order_probability": 0.3,
                    "price_range": 0.5,
                    "order_size": 5,
                }),
            },
        ],
        news_schedule: vec![],
        storyline: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = generate_default_config();
        let report = crate::validator::validate_config(&config);
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = std::env::temp_dir().join(format!("simforge-config-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.yaml");

        let config = generate_default_config();
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.seed, config.seed);
        assert_eq!(loaded.agents.len(), config.agents.len());
        fs::remove_dir_all(&dir).ok();
    }
}
