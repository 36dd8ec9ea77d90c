//! Session configuration for the exchange simulator: everything the
//! Runner needs to construct a reproducible session, loaded from a
//! YAML file with environment-variable substitution, then validated
//! before the session ever leaves `pending`.
//!
//! # Modules
//!
//! - [`defaults`] - default values for optional fields
//! - [`parser`] - YAML load/save, default-config generation
//! - [`substitution`] - `${VAR}` / `$VAR` environment substitution
//! - [`validator`] - fail-fast configuration-error detection

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level configuration for one simulated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seeds the master RNG; fully determines all subsequent draws.
    pub seed: u64,
    /// Exclusive upper bound on simulated time, in milliseconds.
    pub duration_ms: i64,
    /// Rounding granularity for limit prices.
    pub tick_size: f64,
    /// Center price for the book-seeding orders at session start.
    pub initial_price: f64,
    /// Simulated advance per loop iteration.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: i64,
    /// Book-snapshot cadence.
    #[serde(default = "default_snapshot_interval_ms")]
    pub snapshot_interval_ms: i64,
    /// Base OHLCV bar width.
    #[serde(default = "default_ohlcv_resolution_ms")]
    pub ohlcv_resolution_ms: i64,
    /// Depth (levels per side) captured in book snapshots.
    #[serde(default = "default_snapshot_depth")]
    pub snapshot_depth: usize,
    /// The agent roster, ticked in this order every iteration.
    pub agents: Vec<AgentConfig>,
    /// Scheduled news items, replaced wholesale if `storyline` is set.
    #[serde(default)]
    pub news_schedule: Vec<NewsScheduleItem>,
    /// When present, overrides `news_schedule`, `initial_price`, and
    /// `duration_ms` at Runner construction, before the session leaves
    /// `pending`.
    #[serde(default)]
    pub storyline: Option<StorylineConfig>,
}

/// One entry in the agent roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub id: String,
    pub name: String,
    pub archetype: String,
    /// Archetype-specific parameters, parsed by the Runner into the
    /// matching `agents::*Params` struct once the archetype name is
    /// known to be valid.
    pub params: serde_json::Value,
}

/// The recognized archetype names. `Display`/`FromStr`-style matching
/// lives in [`validator`] and in `runner`'s agent construction, both
/// of which must agree on this list.
pub const KNOWN_ARCHETYPES: &[&str] =
    &["noise", "market_maker", "momentum", "informed", "fundamentals"];

/// News sentiment as scheduled in config. Mirrors `tape::Sentiment`
/// without creating a dependency from `config` on the tape/matching
/// crates; `runner` converts between the two at session construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsSentiment {
    Positive,
    Neutral,
    Negative,
}

/// News magnitude as scheduled in config. Mirrors `tape::Magnitude`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsMagnitude {
    Low,
    Medium,
    High,
}

/// One scheduled news item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsScheduleItem {
    pub timestamp_ms: i64,
    pub headline: String,
    pub content: String,
    pub sentiment: NewsSentiment,
    #[serde(default = "default_news_magnitude")]
    pub magnitude: NewsMagnitude,
    pub source: String,
}

/// Overrides `news_schedule`, `initial_price`, and `duration_ms` when
/// attached to a [`SimulationConfig`]. Applied once, at Runner
/// construction, before the session status leaves `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorylineConfig {
    pub initial_price: f64,
    pub duration_ms: i64,
    pub news_schedule: Vec<NewsScheduleItem>,
}
