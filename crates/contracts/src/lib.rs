//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Shard Model
//! - A file is split into ordered byte-range shards, one record each
//! - `destination` (a URL) identifies both the logical file and the HTTP
//!   endpoint the reassembled file is submitted to
//! - A payload exists in exactly one state: base64 text (`ShardRecord`) or
//!   raw bytes (`Shard`) — two types, never one field holding either

mod config;
mod error;
mod shard;
mod staged;
mod submitter;

pub use config::*;
pub use error::*;
pub use shard::*;
pub use staged::*;
pub use submitter::{FileSubmitter, LocalFileSubmitter};
