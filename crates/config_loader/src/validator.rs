//! Configuration validation
//!
//! Rules:
//! - staging.root must not be empty
//! - dispatch.timeout_secs > 0
//! - dispatch.max_in_flight >= 1

use contracts::{RelayConfig, RelayError};

/// Validate RelayConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &RelayConfig) -> Result<(), RelayError> {
    validate_staging(config)?;
    validate_dispatch(config)?;
    Ok(())
}

fn validate_staging(config: &RelayConfig) -> Result<(), RelayError> {
    if config.staging.root.as_os_str().is_empty() {
        return Err(RelayError::config_validation(
            "staging.root",
            "staging root cannot be empty",
        ));
    }
    Ok(())
}

fn validate_dispatch(config: &RelayConfig) -> Result<(), RelayError> {
    if config.dispatch.timeout_secs == 0 {
        return Err(RelayError::config_validation(
            "dispatch.timeout_secs",
            "timeout must be > 0",
        ));
    }

    if config.dispatch.max_in_flight == 0 {
        return Err(RelayError::config_validation(
            "dispatch.max_in_flight",
            "must be >= 1 (1 = sequential dispatch)",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DispatchConfig, StagingConfig};
    use std::path::PathBuf;

    fn minimal_config() -> RelayConfig {
        RelayConfig {
            staging: StagingConfig {
                root: PathBuf::from("/tmp/shard-relay"),
            },
            dispatch: DispatchConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = minimal_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_staging_root() {
        let mut config = minimal_config();
        config.staging.root = PathBuf::new();
        let result = validate(&config);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = minimal_config();
        config.dispatch.timeout_secs = 0;
        let result = validate(&config);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("timeout must be > 0"), "got: {err}");
    }

    #[test]
    fn test_zero_workers() {
        let mut config = minimal_config();
        config.dispatch.max_in_flight = 0;
        let result = validate(&config);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("must be >= 1"), "got: {err}");
    }
}
