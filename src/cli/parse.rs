//! CLI parse: clap types for ctxrelay. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ctxrelay - unified context assembly and progress fan-out
#[derive(Parser)]
#[command(name = "ctxrelay")]
#[command(about = "Assemble unified workflow context and relay progress events")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for config/config.toml)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble the unified context for a correlation id and print it as JSON
    Assemble {
        /// Correlation id (primary record id)
        #[arg(long)]
        id: String,
        /// Lane id for the idempotency key
        #[arg(long)]
        lane: Option<String>,
        /// Fixture file of records; the HTTP store from config is used otherwise
        #[arg(long)]
        records: Option<PathBuf>,
    },
    /// Print only the lane plan for a correlation id
    Lanes {
        #[arg(long)]
        id: String,
        #[arg(long)]
        records: Option<PathBuf>,
    },
    /// Route a webhook payload file and print the stream frames a subscriber receives
    Webhook {
        #[arg(long)]
        file: PathBuf,
    },
}
