//! FileSubmitter trait - Dispatcher output interface
//!
//! Defines the abstract interface for submitting a staged file to its
//! destination.

use crate::{RelayError, StagedFile};

/// File submission trait
///
/// All submitter implementations must implement this trait.
#[trait_variant::make(FileSubmitter: Send)]
pub trait LocalFileSubmitter {
    /// Submitter name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Submit one staged file to its destination
    ///
    /// # Errors
    /// Returns a dispatch error (should include status or transport detail)
    async fn submit(&self, staged: &StagedFile) -> Result<(), RelayError>;
}
