//! End-to-end checks for the spec's concrete scenarios that span the
//! whole tick loop rather than a single matching-engine call.

use config::{generate_default_config, AgentConfig, NewsMagnitude, NewsScheduleItem, NewsSentiment};
use runner::Runner;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

fn tape_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "simforge-scenario-{}-{}.jsonl",
        std::process::id(),
        label
    ))
}

fn read_tape_lines(path: &PathBuf) -> Vec<Value> {
    fs::read_to_string(path)
        .expect("read tape")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each tape line is valid JSON"))
        .collect()
}

/// Scenario 6: a single positive news item fires at t = 1000ms. The
/// tape must carry exactly one redacted `news` event, and the informed
/// trader must react with a market buy in that same tick.
#[test]
fn sentiment_is_redacted_and_informed_trader_reacts_same_tick() {
    let mut config = generate_default_config();
    config.agents.push(AgentConfig {
        id: "informed-1".to_string(),
        name: "Informed Trader".to_string(),
        archetype: "informed".to_string(),
        params: serde_json::json!({
            "reaction_strength": 1.0,
            "order_size": 20,
            "max_position": 500,
        }),
    });
    config.news_schedule.push(NewsScheduleItem {
        timestamp_ms: 1_000,
        headline: "big positive surprise".to_string(),
        content: "details of the surprise".to_string(),
        sentiment: NewsSentiment::Positive,
        magnitude: NewsMagnitude::High,
        source: "wire".to_string(),
    });

    let path = tape_path("news-redaction");
    let tape_file = fs::File::create(&path).expect("create tape file");
    let sim = Runner::new(config, "sess-news", "scenario 6", 0, tape_file).expect("valid config");
    let summary = sim.run_to_completion();
    assert_eq!(summary.status, storage::SessionStatus::Completed);

    let events = read_tape_lines(&path);

    let news_events: Vec<&Value> = events
        .iter()
        .filter(|e| e["type"] == "news")
        .collect();
    assert_eq!(news_events.len(), 1, "exactly one news event is written to the tape");
    let news_payload = &news_events[0]["news"];
    assert!(news_payload.get("sentiment").is_none(), "sentiment must never reach the tape");
    assert!(news_payload.get("magnitude").is_none(), "magnitude is redacted alongside sentiment");

    let informed_market_buys: Vec<&Value> = events
        .iter()
        .filter(|e| {
            e["type"] == "order_placed"
                && e["order"]["agent_id"] == "informed-1"
                && e["order"]["order_type"] == "market"
                && e["order"]["side"] == "buy"
        })
        .collect();
    assert!(
        !informed_market_buys.is_empty(),
        "informed trader must place at least one market buy reacting to positive news"
    );

    let reacted_same_tick = informed_market_buys.iter().any(|e| {
        let ts = e["timestamp"].as_i64().expect("timestamp is an integer");
        (1_000..=1_100).contains(&ts)
    });
    assert!(
        reacted_same_tick,
        "informed trader's reaction must land in the same tick window as the news release"
    );

    fs::remove_file(&path).ok();
}

/// Book seeding (spec §4.8): five bid and five ask resting orders from
/// the reserved "SEED" agent id are on the tape before any agent ticks.
#[test]
fn book_seeding_places_ten_resting_orders_before_the_loop_starts() {
    let mut config = generate_default_config();
    config.agents.truncate(1); // a single market maker still quotes against the seed book
    config.duration_ms = 1_000;

    let path = tape_path("seed-only");
    let tape_file = fs::File::create(&path).expect("create tape file");
    let sim = Runner::new(config, "sess-seed", "scenario 1", 0, tape_file).expect("valid config");
    let summary = sim.run_to_completion();

    assert_eq!(summary.status, storage::SessionStatus::Completed);

    let events = read_tape_lines(&path);
    let seed_orders: Vec<&Value> = events
        .iter()
        .filter(|e| e["type"] == "order_placed" && e["order"]["agent_id"] == "SEED")
        .collect();
    assert_eq!(seed_orders.len(), 10, "five bid and five ask seed orders are placed before the loop starts");

    fs::remove_file(&path).ok();
}
