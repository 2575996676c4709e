//! Dispatcher - fans staged files out to a bounded worker pool

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use contracts::{DispatchResult, FileSubmitter, StagedFile};
use observability::record_dispatch_outcome;

use crate::error::DispatcherError;
use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::submitter::HttpSubmitter;

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Concurrent submissions; 1 reproduces strictly sequential dispatch
    pub max_in_flight: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { max_in_flight: 1 }
    }
}

/// Submits staged files and collects one result per input.
///
/// Destinations are independent units of work: a failure is recorded in that
/// destination's result and never aborts or blocks the others. Results come
/// back in input order regardless of completion order.
pub struct Dispatcher<S> {
    submitter: Arc<S>,
    config: DispatcherConfig,
    metrics: Arc<DispatchMetrics>,
}

impl<S: FileSubmitter + Send + Sync + 'static> Dispatcher<S> {
    /// Create a dispatcher around a submitter
    pub fn new(submitter: S, config: DispatcherConfig) -> Self {
        Self {
            submitter: Arc::new(submitter),
            config,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Get current metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Submit every staged file, one result per input, input order preserved.
    #[instrument(name = "dispatcher_dispatch_all", skip(self, staged), fields(files = staged.len()))]
    pub async fn dispatch_all(&self, staged: Vec<StagedFile>) -> Vec<DispatchResult> {
        if staged.is_empty() {
            return Vec::new();
        }

        let worker_count = self.config.max_in_flight.max(1).min(staged.len());
        let file_count = staged.len();

        let (work_tx, work_rx) = async_channel::bounded(file_count);
        let (result_tx, mut result_rx) = mpsc::channel(file_count);

        for item in staged.into_iter().enumerate() {
            // Channel is sized to the batch; send cannot block here
            let _ = work_tx.send(item).await;
        }
        drop(work_tx);

        let workers: Vec<_> = (0..worker_count)
            .map(|_| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let submitter = Arc::clone(&self.submitter);
                let metrics = Arc::clone(&self.metrics);

                tokio::spawn(async move {
                    while let Ok((index, file)) = work_rx.recv().await {
                        let result = submit_one(submitter.as_ref(), &metrics, file).await;
                        let _ = result_tx.send((index, result)).await;
                    }
                })
            })
            .collect();
        drop(result_tx);

        let mut indexed = Vec::with_capacity(file_count);
        while let Some(pair) = result_rx.recv().await {
            indexed.push(pair);
        }
        for worker in workers {
            let _ = worker.await;
        }

        indexed.sort_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }
}

/// Submit one file, mapping the outcome to a DispatchResult
async fn submit_one<S: FileSubmitter>(
    submitter: &S,
    metrics: &DispatchMetrics,
    file: StagedFile,
) -> DispatchResult {
    match submitter.submit(&file).await {
        Ok(()) => {
            metrics.inc_success_count();
            record_dispatch_outcome(&file.destination, true);
            info!(destination = %file.destination, "dispatch succeeded");
            DispatchResult::success(file.destination, "status 200")
        }
        Err(e) => {
            metrics.inc_failure_count();
            record_dispatch_outcome(&file.destination, false);
            error!(destination = %file.destination, error = %e, "dispatch failed");
            DispatchResult::failure(file.destination, e.to_string())
        }
    }
}

/// Convenience function to create an HTTP dispatcher from config
pub fn create_http_dispatcher(
    config: &contracts::DispatchConfig,
) -> Result<Dispatcher<HttpSubmitter>, DispatcherError> {
    let submitter = HttpSubmitter::new("http", Duration::from_secs(config.timeout_secs))?;
    Ok(Dispatcher::new(
        submitter,
        DispatcherConfig {
            max_in_flight: config.max_in_flight,
        },
    ))
}
