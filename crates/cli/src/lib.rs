//! `clap`-derived argument parsing for the `simforge` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "simforge")]
#[command(about = "Deterministic single-instrument exchange session simulator")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a simulated session to completion and write its tape.
    Run {
        /// Path to the session configuration file.
        #[arg(short, long, default_value = "session.yaml")]
        config: PathBuf,

        /// Path to write the line-delimited JSON tape.
        #[arg(short, long, default_value = "tape.jsonl")]
        tape: PathBuf,

        /// Identifier recorded on the session and every tape event.
        #[arg(long, default_value = "session-1")]
        session_id: String,
    },

    /// Validate a session configuration file without running it.
    Validate {
        /// Path to the session configuration file.
        #[arg(short, long, default_value = "session.yaml")]
        config: PathBuf,
    },

    /// Generate an example session configuration file.
    Init {
        /// Output path for the new configuration file.
        #[arg(short, long, default_value = "session.yaml")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
