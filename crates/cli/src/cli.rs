//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shard Relay - file reassembly and dispatch pipeline
#[derive(Parser, Debug)]
#[command(
    name = "shard-relay",
    author,
    version,
    about = "Reassembles sharded files and republishes them over HTTP",
    long_about = "Reassembles files delivered as out-of-order byte-range shards.\n\n\
                  Groups a shard batch by destination, orders and decodes each \n\
                  group, stages the reconstructed files locally, and submits \n\
                  each one to its destination endpoint via HTTP PUT."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SHARD_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SHARD_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the reassembly pipeline over a shard batch
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "relay.toml", env = "SHARD_RELAY_CONFIG")]
    pub config: PathBuf,

    /// Shard batch file (JSON array or JSON-lines), '-' for stdin
    #[arg(short, long, env = "SHARD_RELAY_BATCH")]
    pub batch: PathBuf,

    /// Override staging root from configuration
    #[arg(long, env = "SHARD_RELAY_STAGING_ROOT")]
    pub staging_root: Option<PathBuf>,

    /// Override dispatch timeout (seconds) from configuration
    #[arg(long, env = "SHARD_RELAY_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Override concurrent submissions from configuration
    #[arg(long, env = "SHARD_RELAY_MAX_IN_FLIGHT")]
    pub max_in_flight: Option<usize>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "SHARD_RELAY_METRICS_PORT")]
    pub metrics_port: u16,

    /// Parse the batch and validate configuration without staging or dispatching
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "relay.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
