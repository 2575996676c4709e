//! # Ingestion
//!
//! Batch boundary module.
//!
//! Responsibilities:
//! - Parse raw shard-record batches (JSON array or JSON-lines) into
//!   fixed-shape `ShardRecord`s, rejecting malformed records with a typed
//!   error at the boundary
//! - Decode base64 payloads, turning `ShardRecord`s into `Shard`s

mod decode;
mod record;

pub use decode::{decode, decode_group};
pub use record::parse_batch;
