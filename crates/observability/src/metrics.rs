//! Relay metrics collection
//!
//! Counter/gauge/histogram helpers for pipeline events, plus an in-memory
//! aggregator used to print run summaries.

use contracts::DispatchResult;
use metrics::{counter, gauge, histogram};

/// Record a parsed batch
pub fn record_batch_received(record_count: usize, destination_count: usize) {
    counter!("shard_relay_records_total").increment(record_count as u64);
    gauge!("shard_relay_batch_destinations").set(destination_count as f64);
}

/// Record a staged file and its size
pub fn record_file_staged(destination: &str, bytes: u64) {
    counter!("shard_relay_files_staged_total").increment(1);
    counter!("shard_relay_bytes_staged_total").increment(bytes);
    histogram!("shard_relay_staged_file_bytes").record(bytes as f64);
    gauge!(
        "shard_relay_last_staged_bytes",
        "destination" => destination.to_string()
    )
    .set(bytes as f64);
}

/// Record a group materialized from fewer/more shards than declared
pub fn record_partial_group(destination: &str) {
    counter!(
        "shard_relay_partial_groups_total",
        "destination" => destination.to_string()
    )
    .increment(1);
}

/// Record a destination skipped before dispatch (decode/path/write failure)
pub fn record_destination_skipped(reason: &str) {
    counter!(
        "shard_relay_destinations_skipped_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

/// Record a dispatch outcome
pub fn record_dispatch_outcome(destination: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "shard_relay_dispatches_total",
        "destination" => destination.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Relay metrics aggregator
///
/// Aggregates per-run counts in memory for summary output.
#[derive(Debug, Clone, Default)]
pub struct RelayMetricsAggregator {
    /// Records received in the batch
    pub records_received: u64,

    /// Files staged successfully
    pub files_staged: u64,

    /// Bytes written to staging
    pub bytes_staged: u64,

    /// Groups whose shard count differed from the declared total
    pub partial_groups: u64,

    /// Destinations skipped before dispatch
    pub destinations_skipped: u64,

    /// Successful dispatches
    pub dispatch_ok: u64,

    /// Failed dispatches
    pub dispatch_failed: u64,

    /// Staged file size statistics
    pub file_size_stats: RunningStats,

    /// Failure detail per destination
    pub failures: std::collections::HashMap<String, String>,
}

impl RelayMetricsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a staged file
    pub fn add_staged(&mut self, bytes: u64, partial: bool) {
        self.files_staged += 1;
        self.bytes_staged += bytes;
        self.file_size_stats.push(bytes as f64);
        if partial {
            self.partial_groups += 1;
        }
    }

    /// Record a destination that never reached dispatch
    pub fn add_skipped(&mut self) {
        self.destinations_skipped += 1;
    }

    /// Update aggregate statistics from a dispatch result
    pub fn update(&mut self, result: &DispatchResult) {
        if result.succeeded {
            self.dispatch_ok += 1;
        } else {
            self.dispatch_failed += 1;
            self.failures
                .insert(result.destination.clone(), result.detail.clone());
        }
    }

    /// Produce a summary report
    pub fn summary(&self) -> MetricsSummary {
        let attempted = self.dispatch_ok + self.dispatch_failed;
        MetricsSummary {
            records_received: self.records_received,
            files_staged: self.files_staged,
            bytes_staged: self.bytes_staged,
            partial_groups: self.partial_groups,
            destinations_skipped: self.destinations_skipped,
            dispatch_ok: self.dispatch_ok,
            dispatch_failed: self.dispatch_failed,
            failure_rate: if attempted > 0 {
                self.dispatch_failed as f64 / attempted as f64 * 100.0
            } else {
                0.0
            },
            file_size_bytes: StatsSummary::from(&self.file_size_stats),
            failures: self.failures.clone(),
        }
    }

    /// Reset statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub records_received: u64,
    pub files_staged: u64,
    pub bytes_staged: u64,
    pub partial_groups: u64,
    pub destinations_skipped: u64,
    pub dispatch_ok: u64,
    pub dispatch_failed: u64,
    pub failure_rate: f64,
    pub file_size_bytes: StatsSummary,
    pub failures: std::collections::HashMap<String, String>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Relay Metrics Summary ===")?;
        writeln!(f, "Records received: {}", self.records_received)?;
        writeln!(
            f,
            "Files staged: {} ({} bytes)",
            self.files_staged, self.bytes_staged
        )?;
        writeln!(f, "Partial groups: {}", self.partial_groups)?;
        writeln!(f, "Destinations skipped: {}", self.destinations_skipped)?;
        writeln!(
            f,
            "Dispatched: {} ok, {} failed ({:.2}% failure)",
            self.dispatch_ok, self.dispatch_failed, self.failure_rate
        )?;
        writeln!(f, "Staged file size (bytes): {}", self.file_size_bytes)?;

        if !self.failures.is_empty() {
            writeln!(f, "Failures:")?;
            for (destination, detail) in &self.failures {
                writeln!(f, "  {}: {}", destination, detail)?;
            }
        }

        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.0}, max={:.0}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Sample count
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum value
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum value
    pub fn max(&self) -> f64 {
        self.max
    }
}
