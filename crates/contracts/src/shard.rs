//! Shard types - Ingestion input/output
//!
//! One shard is one ordered byte-range fragment of a larger file.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Raw shard record as delivered by the upstream stream.
///
/// The transport envelope has already been stripped; `payload` is still
/// base64 text at this boundary. Field shape is fixed — a record missing a
/// field or carrying a mistyped one is rejected during batch parsing, not
/// deep inside processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardRecord {
    /// Destination URL — the file's eventual location
    pub destination: String,

    /// 0-based index of this shard within its file
    pub position: u32,

    /// Declared number of shards composing the file (informational)
    #[serde(rename = "totalCount")]
    pub total_count: u32,

    /// Base64-encoded payload
    pub payload: String,
}

/// Decoded shard: same metadata, payload as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Destination URL — the file's eventual location
    pub destination: String,

    /// 0-based index of this shard within its file
    pub position: u32,

    /// Declared number of shards composing the file (informational)
    pub total_count: u32,

    /// Decoded payload (zero-copy)
    pub payload: Bytes,
}

/// Ordered shard set for a single destination.
///
/// Produced by grouping a batch; records are sorted ascending by `position`,
/// equal positions retaining input order. Consumed once by materialization.
#[derive(Debug, Clone)]
pub struct ShardGroup {
    /// Destination shared by every record in the group
    pub destination: String,

    /// Records in materialization order
    pub records: Vec<ShardRecord>,
}

impl ShardGroup {
    /// Declared shard count, taken from the first record.
    ///
    /// Well-formed input declares the same `total_count` on every shard of a
    /// file; the first record is the group's authority on it.
    pub fn declared_count(&self) -> Option<u32> {
        self.records.first().map(|r| r.total_count)
    }

    /// Whether the records present differ from the declared count.
    pub fn is_partial(&self) -> bool {
        self.declared_count()
            .is_some_and(|declared| declared as usize != self.records.len())
    }
}
