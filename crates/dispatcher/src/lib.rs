//! # Dispatcher
//!
//! Staged-file submission module.
//!
//! Responsible for:
//! - Submitting each staged file to its destination via HTTP PUT
//! - Isolating failures per destination; one bad endpoint never blocks the rest
//! - Bounded worker-pool concurrency (one worker = the reference's sequential behavior)

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod submitter;

pub use contracts::{DispatchResult, FileSubmitter, StagedFile};
pub use dispatcher::{create_http_dispatcher, Dispatcher, DispatcherConfig};
pub use error::DispatcherError;
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use submitter::HttpSubmitter;
