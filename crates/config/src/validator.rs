//! Fail-fast configuration validation.
//!
//! Configuration errors (unknown agent archetype, non-positive tick
//! size, empty agent roster) are detected at Runner construction,
//! before any session-status transition — never discovered mid-loop.

use crate::{SimulationConfig, KNOWN_ARCHETYPES};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duration_ms must be positive, got {0}")]
    NonPositiveDuration(i64),

    #[error("tick_size must be positive, got {0}")]
    NonPositiveTickSize(f64),

    #[error("initial_price must be positive, got {0}")]
    NonPositiveInitialPrice(f64),

    #[error("tick_interval_ms must be positive, got {0}")]
    NonPositiveTickInterval(i64),

    #[error("snapshot_interval_ms must be positive, got {0}")]
    NonPositiveSnapshotInterval(i64),

    #[error("ohlcv_resolution_ms must be positive, got {0}")]
    NonPositiveOhlcvResolution(i64),

    #[error("agent roster must not be empty")]
    EmptyAgentRoster,

    #[error("agent '{agent_id}': unknown archetype '{archetype}'")]
    UnknownArchetype { agent_id: String, archetype: String },

    #[error("duplicate agent id '{0}'")]
    DuplicateAgentId(String),

    #[error("news item at index {index}: timestamp_ms must not be negative, got {timestamp}")]
    NegativeNewsTimestamp { index: usize, timestamp: i64 },

    #[error("storyline duration_ms must be positive, got {0}")]
    NonPositiveStorylineDuration(i64),

    #[error("storyline initial_price must be positive, got {0}")]
    NonPositiveStorylineInitialPrice(f64),
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

/// The outcome of validating a [`SimulationConfig`]: a session is only
/// constructible when `errors` is empty.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}

/// Validate a [`SimulationConfig`], collecting every violation rather
/// than stopping at the first (so a bad config yields one actionable
/// report instead of a fix-one-error-at-a-time loop).
pub fn validate_config(config: &SimulationConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    if config.duration_ms <= 0 {
        report.add_error(ValidationError::NonPositiveDuration(config.duration_ms));
    }
    if config.tick_size <= 0.0 {
        report.add_error(ValidationError::NonPositiveTickSize(config.tick_size));
    }
    if config.initial_price <= 0.0 {
        report.add_error(ValidationError::NonPositiveInitialPrice(config.initial_price));
    }
    if config.tick_interval_ms <= 0 {
        report.add_error(ValidationError::NonPositiveTickInterval(config.tick_interval_ms));
    }
    if config.snapshot_interval_ms <= 0 {
        report.add_error(ValidationError::NonPositiveSnapshotInterval(
            config.snapshot_interval_ms,
        ));
    }
    if config.ohlcv_resolution_ms <= 0 {
        report.add_error(ValidationError::NonPositiveOhlcvResolution(
            config.ohlcv_resolution_ms,
        ));
    }

    if config.agents.is_empty() {
        report.add_error(ValidationError::EmptyAgentRoster);
    }

    let mut seen_ids = std::collections::HashSet::new();
    for agent in &config.agents {
        if !seen_ids.insert(agent.id.clone()) {
            report.add_error(ValidationError::DuplicateAgentId(agent.id.clone()));
        }
        if !KNOWN_ARCHETYPES.contains(&agent.archetype.as_str()) {
            report.add_error(ValidationError::UnknownArchetype {
                agent_id: agent.id.clone(),
                archetype: agent.archetype.clone(),
            });
        }
    }

    for (index, item) in config.news_schedule.iter().enumerate() {
        if item.timestamp_ms < 0 {
            report.add_error(ValidationError::NegativeNewsTimestamp {
                index,
                timestamp: item.timestamp_ms,
            });
        }
    }

    if let Some(storyline) = &config.storyline {
        if storyline.duration_ms <= 0 {
            report.add_error(ValidationError::NonPositiveStorylineDuration(
                storyline.duration_ms,
            ));
        }
        if storyline.initial_price <= 0.0 {
            report.add_error(ValidationError::NonPositiveStorylineInitialPrice(
                storyline.initial_price,
            ));
        }
        for (index, item) in storyline.news_schedule.iter().enumerate() {
            if item.timestamp_ms < 0 {
                report.add_error(ValidationError::NegativeNewsTimestamp {
                    index,
                    timestamp: item.timestamp_ms,
                });
            }
        }
    } else if config.agents.len() == 1 {
        report.add_warning(
            "agents",
            "a single-agent roster can never cross the spread on its own; trades will only come from seed-order interaction",
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgentConfig;

    fn base_config() -> SimulationConfig {
        SimulationConfig {
            seed: 1,
            duration_ms: 1000,
            tick_size: 0.5,
            initial_price: 100.0,
            tick_interval_ms: 100,
            snapshot_interval_ms: 1000,
            ohlcv_resolution_ms: 1000,
            snapshot_depth: 10,
            agents: vec![AgentConfig {
                id: "n1".into(),
                name: "Noise".into(),
                archetype: "noise".into(),
                params: serde_json::json!({}),
            }],
            news_schedule: vec![],
            storyline: None,
        }
    }

    #[test]
    fn valid_config_has_no_errors() {
        let report = validate_config(&base_config());
        assert!(report.is_valid(), "{:?}", report.errors);
    }

    #[test]
    fn rejects_empty_roster() {
        let mut config = base_config();
        config.agents.clear();
        let report = validate_config(&config);
        assert!(report.errors.contains(&ValidationError::EmptyAgentRoster));
    }

    #[test]
    fn rejects_unknown_archetype() {
        let mut config = base_config();
        config.agents[0].archetype = "bogus".into();
        let report = validate_config(&config);
        assert!(matches!(
            report.errors[0],
            ValidationError::UnknownArchetype { .. }
        ));
    }

    #[test]
    fn rejects_non_positive_tick_size() {
        let mut config = base_config();
        config.tick_size = 0.0;
        let report = validate_config(&config);
        assert!(report
            .errors
            .contains(&ValidationError::NonPositiveTickSize(0.0)));
    }

    #[test]
    fn rejects_duplicate_agent_ids() {
        let mut config = base_config();
        let mut dup = config.agents[0].clone();
        dup.name = "Noise 2".into();
        config.agents.push(dup);
        let report = validate_config(&config);
        assert!(report
            .errors
            .contains(&ValidationError::DuplicateAgentId("n1".into())));
    }
}
