//! Layered error definitions
//!
//! Categorized by source: config / record boundary / decode / staging / dispatch

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum RelayError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Record Boundary Errors =====
    /// Shard record shape error (missing/mistyped field, bad JSON)
    #[error("shard record shape error at {location}: {message}")]
    RecordShape { location: String, message: String },

    // ===== Decode Errors =====
    /// Malformed base64 payload; identifies the offending shard
    #[error("payload decode error for '{destination}' shard {position}: {message}")]
    Decode {
        destination: String,
        position: u32,
        message: String,
    },

    // ===== Staging Errors =====
    /// Destination string yields no derivable filename
    #[error("no filename could be derived from destination '{destination}'")]
    PathParse { destination: String },

    /// Filesystem failure while writing the staged file
    #[error("staging write error for '{destination}' at {path}: {message}")]
    StagingWrite {
        destination: String,
        path: String,
        message: String,
    },

    // ===== Dispatch Errors =====
    /// Non-200 response or transport failure during submission
    #[error("dispatch error for '{destination}': {message}")]
    Dispatch {
        destination: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl RelayError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create shard record shape error
    pub fn record_shape(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordShape {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create payload decode error
    pub fn decode(
        destination: impl Into<String>,
        position: u32,
        message: impl Into<String>,
    ) -> Self {
        Self::Decode {
            destination: destination.into(),
            position,
            message: message.into(),
        }
    }

    /// Create staging write error
    pub fn staging_write(
        destination: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::StagingWrite {
            destination: destination.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create dispatch error
    pub fn dispatch(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dispatch {
            destination: destination.into(),
            message: message.into(),
        }
    }
}
