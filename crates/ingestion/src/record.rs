//! Shard record batch parsing
//!
//! The upstream transport envelope has already been stripped; what arrives
//! here is either a JSON array of shard records or one record per line
//! (JSON-lines). A record with a missing or mistyped field fails the batch
//! with an error naming the offending index or line.

use contracts::{RelayError, ShardRecord};
use tracing::debug;

/// Parse a raw batch into shard records.
///
/// Detects the input form from the first non-whitespace character: `[` means
/// a JSON array, anything else is treated as JSON-lines.
pub fn parse_batch(input: &str) -> Result<Vec<ShardRecord>, RelayError> {
    let trimmed = input.trim_start();

    let records = if trimmed.starts_with('[') {
        parse_array(trimmed)?
    } else {
        parse_lines(input)?
    };

    debug!(records = records.len(), "batch parsed");
    Ok(records)
}

fn parse_array(input: &str) -> Result<Vec<ShardRecord>, RelayError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(input)
        .map_err(|e| RelayError::record_shape("batch", format!("invalid JSON array: {e}")))?;

    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value)
                .map_err(|e| RelayError::record_shape(format!("record {index}"), e.to_string()))
        })
        .collect()
}

fn parse_lines(input: &str) -> Result<Vec<ShardRecord>, RelayError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line).map_err(|e| {
                RelayError::record_shape(format!("line {}", number + 1), e.to_string())
            })
        })
        .collect()
}
