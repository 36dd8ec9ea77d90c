//! `simforge` CLI binary.
//!
//! Loads a session configuration, validates it, and either runs the
//! session to completion (writing its tape to disk) or reports a
//! validation summary without simulating anything.

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use config::{generate_default_config, load_config, save_config, validate_config};
use observability::{init_logging, LogFormat};
use runner::Runner;
use std::fs::File;
use std::path::Path;
use storage::{InMemoryOhlcvStore, InMemorySessionStore, InMemorySnapshotStore};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    init_logging("simforge", LogFormat::Pretty)?;

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Run {
            config,
            tape,
            session_id,
        } => run_command(config, tape, session_id),
        Commands::Validate { config } => validate_command(config),
        Commands::Init { output } => init_command(output),
    }
}

fn run_command<P: AsRef<Path>>(config_path: P, tape_path: P, session_id: String) -> Result<()> {
    let config_path = config_path.as_ref();
    let tape_path = tape_path.as_ref();

    let config = load_config(config_path)
        .with_context(|| format!("failed to load session configuration: {:?}", config_path))?;

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "configuration warning");
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("cannot run a session with invalid configuration");
    }

    if let Some(parent) = tape_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {:?}", parent))?;
        }
    }
    let tape_file =
        File::create(tape_path).with_context(|| format!("failed to create tape file: {:?}", tape_path))?;

    let created_at_ms = 0;
    let runner = Runner::new(config, session_id.clone(), session_id.clone(), created_at_ms, tape_file)
        .context("failed to construct session runner")?
        .with_snapshot_store(Box::new(InMemorySnapshotStore::new()))
        .with_ohlcv_store(Box::new(InMemoryOhlcvStore::new()))
        .with_session_store(Box::new(InMemorySessionStore::new()));

    info!(session_id = %session_id, tape = ?tape_path, "starting session");
    let summary = runner.run_to_completion();

    println!();
    println!("Session {} finished: {:?}", summary.session_id, summary.status);
    println!("  events: {}", summary.event_count);
    println!("  trades: {}", summary.trade_count);
    if let Some(price) = summary.final_price {
        println!("  final price: {:.2}", price);
    }
    println!("  tape: {:?}", tape_path);

    if !matches!(summary.status, storage::SessionStatus::Completed) {
        anyhow::bail!("session did not complete successfully");
    }

    Ok(())
}

fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config_path = config_path.as_ref();
    info!(path = ?config_path, "validating session configuration");

    let config = load_config(config_path)
        .with_context(|| format!("failed to load session configuration: {:?}", config_path))?;

    let report = validate_config(&config);

    println!();
    println!("=== Configuration Validation Report ===");
    println!();

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Seed: {}", config.seed);
    println!("Duration: {} ms", config.duration_ms);
    println!("Tick size: {}", config.tick_size);
    println!("Initial price: {}", config.initial_price);
    println!("Agents: {}", config.agents.len());
    println!("News items scheduled: {}", config.news_schedule.len());
    if config.storyline.is_some() {
        println!("Storyline: present (overrides initial price, duration, and news schedule)");
    }

    Ok(())
}

fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "writing example session configuration");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, output_path)?;

    println!("[ok] Session configuration created.");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("This configuration includes:");
    println!("  - a seed and a 5-second session duration");
    println!("  - one market-maker and one noise trader");
    println!();
    println!("Next steps:");
    println!("  1. Edit the configuration file to customize agents, news, or timing");
    println!(
        "  2. Run `simforge validate --config {:?}` to check it",
        output_path
    );
    println!(
        "  3. Run `simforge run --config {:?} --tape tape.jsonl` to simulate a session",
        output_path
    );

    Ok(())
}
