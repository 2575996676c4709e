//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    staging: StagingInfo,
    dispatch: DispatchInfo,
}

#[derive(Serialize)]
struct StagingInfo {
    root: String,
}

#[derive(Serialize)]
struct DispatchInfo {
    timeout_secs: u64,
    max_in_flight: usize,
    mode: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let relay = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&relay);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&relay);
    }

    Ok(())
}

fn build_config_info(relay: &contracts::RelayConfig) -> ConfigInfo {
    ConfigInfo {
        staging: StagingInfo {
            root: relay.staging.root.display().to_string(),
        },
        dispatch: DispatchInfo {
            timeout_secs: relay.dispatch.timeout_secs,
            max_in_flight: relay.dispatch.max_in_flight,
            mode: dispatch_mode(relay),
        },
    }
}

fn dispatch_mode(relay: &contracts::RelayConfig) -> String {
    if relay.dispatch.max_in_flight == 1 {
        "sequential".to_string()
    } else {
        format!("concurrent ({} workers)", relay.dispatch.max_in_flight)
    }
}

fn print_config_info(relay: &contracts::RelayConfig) {
    println!("\n=== Shard Relay Configuration ===\n");

    println!("Staging");
    println!("   └─ Root: {}", relay.staging.root.display());

    println!("\nDispatch");
    println!("   ├─ Timeout: {}s", relay.dispatch.timeout_secs);
    println!("   └─ Mode: {}", dispatch_mode(relay));

    println!();
}
