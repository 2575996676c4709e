//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Submitter creation error (e.g. HTTP client build failure)
    #[error("failed to create submitter '{name}': {message}")]
    SubmitterCreation { name: String, message: String },

    /// Submission error (from contract)
    #[error("submit error: {0}")]
    Contract(#[from] contracts::RelayError),
}

impl DispatcherError {
    /// Create a submitter creation error
    pub fn submitter_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SubmitterCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
