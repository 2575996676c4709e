//! `run` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut relay = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref staging_root) = args.staging_root {
        info!(staging_root = %staging_root.display(), "Overriding staging root from CLI");
        relay.staging.root = staging_root.clone();
    }
    if let Some(timeout) = args.timeout {
        info!(timeout_secs = timeout, "Overriding dispatch timeout from CLI");
        relay.dispatch.timeout_secs = timeout;
    }
    if let Some(max_in_flight) = args.max_in_flight {
        info!(max_in_flight, "Overriding max in flight from CLI");
        relay.dispatch.max_in_flight = max_in_flight;
    }

    info!(
        staging_root = %relay.staging.root.display(),
        timeout_secs = relay.dispatch.timeout_secs,
        max_in_flight = relay.dispatch.max_in_flight,
        "Configuration loaded"
    );

    // Read and parse the shard batch
    let raw_batch = read_batch(&args.batch)
        .with_context(|| format!("Failed to read batch from {}", args.batch.display()))?;
    let records = ingestion::parse_batch(&raw_batch)
        .with_context(|| format!("Failed to parse batch from {}", args.batch.display()))?;

    info!(records = records.len(), "Batch parsed");

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration and batch are valid, exiting");
        print_batch_summary(&relay, &records);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        relay,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create and run pipeline
    let pipeline = Pipeline::new(pipeline_config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting pipeline...");

    // Run pipeline with shutdown signal
    tokio::select! {
        result = pipeline.run(records) => {
            match result {
                Ok(stats) => {
                    info!(
                        files_staged = stats.files_staged,
                        dispatched_ok = stats.dispatched_ok,
                        dispatched_failed = stats.dispatched_failed,
                        duration_secs = stats.duration.as_secs_f64(),
                        "Pipeline completed"
                    );

                    // Print detailed statistics
                    stats.print_summary();
                }
                Err(e) => {
                    return Err(e).context("Pipeline execution failed");
                }
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping pipeline...");
        }
    }

    info!("Shard Relay finished");
    Ok(())
}

/// Read the raw batch content, `-` meaning stdin
fn read_batch(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print batch summary for dry-run mode
fn print_batch_summary(relay: &contracts::RelayConfig, records: &[contracts::ShardRecord]) {
    let groups = assembly::group_by_destination(records.to_vec());

    println!("\n=== Batch Summary ===\n");
    println!("Staging root: {}", relay.staging.root.display());
    println!(
        "Dispatch: timeout {}s, {} in flight",
        relay.dispatch.timeout_secs, relay.dispatch.max_in_flight
    );
    println!("\nRecords: {}", records.len());
    println!("Destinations ({}):", groups.len());
    for group in &groups {
        let partial = if group.is_partial() { " [partial]" } else { "" };
        println!(
            "  - {} ({} shards, {} declared){}",
            group.destination,
            group.records.len(),
            group.declared_count().unwrap_or(0),
            partial
        );
    }

    println!();
}
