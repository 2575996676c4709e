//! Pipeline orchestrator - coordinates all components.
//!
//! One run: group the batch by destination, decode each group, materialize
//! the staged files, dispatch them, and collect one result per destination.

use std::time::Instant;

use anyhow::{Context, Result};
use assembly::Materializer;
use contracts::{DispatchResult, RelayConfig, RelayError, ShardGroup, ShardRecord, StagedFile};
use dispatcher::create_http_dispatcher;
use observability::{record_batch_received, record_destination_skipped, RelayMetricsAggregator};
use tracing::{info, warn};

use super::PipelineStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The relay configuration
    pub relay: RelayConfig,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Per-destination unit of work after staging
enum Unit {
    /// Destination failed before dispatch; carries the surfaced result
    Skipped(DispatchResult),
    /// Index into the staged-file list handed to the dispatcher
    Staged(usize),
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline over one shard batch
    pub async fn run(self, records: Vec<ShardRecord>) -> Result<PipelineStats> {
        let start_time = Instant::now();

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let mut aggregator = RelayMetricsAggregator::new();
        aggregator.records_received = records.len() as u64;

        // Group
        let groups = assembly::group_by_destination(records);
        record_batch_received(aggregator.records_received as usize, groups.len());
        info!(
            records = aggregator.records_received,
            groups = groups.len(),
            "Batch grouped"
        );

        // Decode + materialize, destination by destination
        let materializer = Materializer::new(&self.config.relay.staging.root).with_context(|| {
            format!(
                "Failed to prepare staging root {}",
                self.config.relay.staging.root.display()
            )
        })?;

        let mut units: Vec<Unit> = Vec::with_capacity(groups.len());
        let mut staged: Vec<StagedFile> = Vec::new();

        for group in groups {
            match stage_group(&materializer, &mut aggregator, group) {
                Ok(file) => {
                    units.push(Unit::Staged(staged.len()));
                    staged.push(file);
                }
                Err(result) => units.push(Unit::Skipped(result)),
            }
        }

        info!(
            staged = staged.len(),
            skipped = units.len() - staged.len(),
            "Materialization complete"
        );

        // Dispatch
        let dispatcher = create_http_dispatcher(&self.config.relay.dispatch)
            .context("Failed to create dispatcher")?;
        let dispatched = dispatcher.dispatch_all(staged).await;

        for result in &dispatched {
            aggregator.update(result);
        }

        // One result per destination, in group order
        let results: Vec<DispatchResult> = units
            .into_iter()
            .map(|unit| match unit {
                Unit::Skipped(result) => result,
                Unit::Staged(index) => dispatched[index].clone(),
            })
            .collect();

        let summary = aggregator.summary();
        Ok(PipelineStats {
            records_received: summary.records_received,
            groups: results.len(),
            files_staged: summary.files_staged,
            destinations_skipped: summary.destinations_skipped,
            dispatched_ok: summary.dispatch_ok,
            dispatched_failed: summary.dispatch_failed,
            duration: start_time.elapsed(),
            results,
            summary,
        })
    }
}

/// Decode and materialize one group.
///
/// Any failure here is destination-local: the group is excluded from
/// dispatch and surfaced as a failed result, sibling groups proceed.
fn stage_group(
    materializer: &Materializer,
    aggregator: &mut RelayMetricsAggregator,
    group: ShardGroup,
) -> Result<StagedFile, DispatchResult> {
    let destination = group.destination.clone();
    let partial = group.is_partial();

    let shards = match ingestion::decode_group(group) {
        Ok(shards) => shards,
        Err(e) => return Err(skip(aggregator, destination, "decode", e)),
    };

    let bytes: u64 = shards.iter().map(|s| s.payload.len() as u64).sum();

    match materializer.materialize(&destination, &shards) {
        Ok(file) => {
            aggregator.add_staged(bytes, partial);
            Ok(file)
        }
        Err(e) => {
            let reason = match &e {
                RelayError::PathParse { .. } => "path_parse",
                _ => "staging_write",
            };
            Err(skip(aggregator, destination, reason, e))
        }
    }
}

fn skip(
    aggregator: &mut RelayMetricsAggregator,
    destination: String,
    reason: &str,
    error: RelayError,
) -> DispatchResult {
    warn!(destination = %destination, reason, error = %error, "Destination skipped");
    record_destination_skipped(reason);
    aggregator.add_skipped();
    DispatchResult::failure(destination, format!("skipped before dispatch: {error}"))
}
