//! Pipeline statistics and run summary.

use std::time::Duration;

use contracts::DispatchResult;
use observability::MetricsSummary;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Shard records in the input batch
    pub records_received: u64,

    /// Destination groups formed from the batch
    pub groups: usize,

    /// Files staged successfully
    pub files_staged: u64,

    /// Destinations that never reached dispatch (decode/path/write failure)
    pub destinations_skipped: u64,

    /// Successful dispatches
    pub dispatched_ok: u64,

    /// Failed dispatches
    pub dispatched_failed: u64,

    /// Total duration of the run
    pub duration: Duration,

    /// One result per destination, in group order
    pub results: Vec<DispatchResult>,

    /// Aggregated relay metrics
    pub summary: MetricsSummary,
}

impl PipelineStats {
    /// Failure rate across attempted dispatches, as a percentage
    pub fn failure_rate(&self) -> f64 {
        let attempted = self.dispatched_ok + self.dispatched_failed;
        if attempted > 0 {
            self.dispatched_failed as f64 / attempted as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Relay Run Summary ===\n");

        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Records received: {}", self.records_received);
        println!("   ├─ Destination groups: {}", self.groups);
        println!("   ├─ Files staged: {}", self.files_staged);
        println!("   ├─ Skipped destinations: {}", self.destinations_skipped);
        println!(
            "   └─ Dispatched: {} ok, {} failed ({:.2}% failure)",
            self.dispatched_ok,
            self.dispatched_failed,
            self.failure_rate()
        );

        println!("\nStaging");
        println!("   ├─ Bytes written: {}", self.summary.bytes_staged);
        println!("   ├─ File size (bytes): {}", self.summary.file_size_bytes);
        println!("   └─ Partial groups: {}", self.summary.partial_groups);

        if !self.results.is_empty() {
            println!("\nOutcomes");
            for (i, result) in self.results.iter().enumerate() {
                let prefix = if i == self.results.len() - 1 {
                    "└─"
                } else {
                    "├─"
                };
                let status = if result.succeeded { "ok" } else { "FAILED" };
                println!(
                    "   {} [{}] {} ({})",
                    prefix, status, result.destination, result.detail
                );
            }
        }

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_rate() {
        let stats = PipelineStats {
            dispatched_ok: 3,
            dispatched_failed: 1,
            ..Default::default()
        };
        assert!((stats.failure_rate() - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_failure_rate_no_dispatches() {
        let stats = PipelineStats::default();
        assert_eq!(stats.failure_rate(), 0.0);
    }
}
