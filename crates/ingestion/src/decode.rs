//! Payload decoding
//!
//! Pure transformation: base64 text payload -> raw bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use contracts::{RelayError, Shard, ShardGroup, ShardRecord};

/// Decode one shard record's payload.
///
/// # Errors
/// Malformed base64 yields a decode error identifying the offending shard's
/// destination and position.
pub fn decode(record: ShardRecord) -> Result<Shard, RelayError> {
    let payload = STANDARD
        .decode(record.payload.as_bytes())
        .map_err(|e| RelayError::decode(&record.destination, record.position, e.to_string()))?;

    Ok(Shard {
        destination: record.destination,
        position: record.position,
        total_count: record.total_count,
        payload: Bytes::from(payload),
    })
}

/// Decode every record of a group, preserving order.
///
/// The first malformed payload fails the whole group; the caller decides
/// whether that is destination-local or batch-fatal.
pub fn decode_group(group: ShardGroup) -> Result<Vec<Shard>, RelayError> {
    group.records.into_iter().map(decode).collect()
}
