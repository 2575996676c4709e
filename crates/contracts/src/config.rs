//! RelayConfig - Config Loader output
//!
//! Describes a complete relay run: staging location and dispatch behavior.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Staging settings
    pub staging: StagingConfig,

    /// Dispatch settings
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Staging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Directory reassembled files are written to before submission
    pub root: PathBuf,
}

/// Dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Outbound request timeout (seconds), must be > 0
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Concurrent submissions, must be >= 1 (1 = sequential)
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_in_flight() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_in_flight, 1);
    }

    #[test]
    fn staging_only_json() {
        let json = r#"{ "staging": { "root": "/tmp/relay" } }"#;
        let config: RelayConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.staging.root, PathBuf::from("/tmp/relay"));
        assert_eq!(config.dispatch.max_in_flight, 1);
    }
}
