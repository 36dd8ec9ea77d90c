//! End-to-end determinism check (spec scenario 5): two sessions built
//! from the identical configuration, seed included, must produce
//! byte-identical tape files and agreeing counters.

use config::{generate_default_config, AgentConfig};
use runner::Runner;
use std::fs;
use std::path::PathBuf;

fn tape_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "simforge-determinism-{}-{}.jsonl",
        std::process::id(),
        label
    ))
}

fn run_session(config: config::SimulationConfig, session_id: &str, path: &PathBuf) -> runner::SessionSummary {
    let tape_file = fs::File::create(path).expect("create tape file");
    let sim = Runner::new(config, session_id, "determinism check", 0, tape_file).expect("valid config");
    sim.run_to_completion()
}

#[test]
fn identical_seed_config_produces_byte_identical_tapes() {
    let config = generate_default_config();

    let path_a = tape_path("a");
    let path_b = tape_path("b");

    let summary_a = run_session(config.clone(), "s-a", &path_a);
    let summary_b = run_session(config, "s-b", &path_b);

    assert_eq!(summary_a.event_count, summary_b.event_count);
    assert_eq!(summary_a.trade_count, summary_b.trade_count);
    assert_eq!(summary_a.final_price, summary_b.final_price);

    // session ids differ (they're embedded in every tape line), so
    // compare tapes with that one field normalized out rather than
    // raw bytes.
    let bytes_a = fs::read_to_string(&path_a).expect("read tape a");
    let bytes_b = fs::read_to_string(&path_b).expect("read tape b");
    let normalized_a = bytes_a.replace("s-a", "SESSION");
    let normalized_b = bytes_b.replace("s-b", "SESSION");
    assert_eq!(normalized_a, normalized_b, "tapes must be byte-identical modulo session id");

    fs::remove_file(&path_a).ok();
    fs::remove_file(&path_b).ok();
}

#[test]
fn identical_seed_with_news_and_multiple_archetypes_is_deterministic() {
    let mut config = generate_default_config();
    config.agents.push(AgentConfig {
        id: "mom-1".to_string(),
        name: "Momentum".to_string(),
        archetype: "momentum".to_string(),
        params: serde_json::json!({
            "lookback_period": 5,
            "threshold": 0.01,
            "cooldown_period_ticks": 3,
            "max_position": 200,
            "max_deviation": 0.3,
            "order_size": 15,
        }),
    });
    config.agents.push(AgentConfig {
        id: "fund-1".to_string(),
        name: "Fundamentals".to_string(),
        archetype: "fundamentals".to_string(),
        params: serde_json::json!({
            "drift_per_tick": 0.0001,
            "volatility_per_tick": 0.001,
            "drift_update_interval_ms": 500,
            "reaction_lag_ms": 200,
            "news_drift_decay": 0.2,
            "deviation_threshold": 0.02,
            "base_order_size": 8,
            "max_position": 150,
        }),
    });

    let path_a = tape_path("multi-a");
    let path_b = tape_path("multi-b");

    let summary_a = run_session(config.clone(), "sess", &path_a);
    let summary_b = run_session(config, "sess", &path_b);

    assert_eq!(summary_a.event_count, summary_b.event_count);
    assert_eq!(summary_a.trade_count, summary_b.trade_count);
    assert_eq!(summary_a.final_price, summary_b.final_price);

    let bytes_a = fs::read(&path_a).expect("read tape a");
    let bytes_b = fs::read(&path_b).expect("read tape b");
    assert_eq!(bytes_a, bytes_b, "tapes must be byte-identical for identical config and seed");

    fs::remove_file(&path_a).ok();
    fs::remove_file(&path_b).ok();
}
