//! # Assembly
//!
//! File reassembly module.
//!
//! Responsibilities:
//! - Partition a shard batch by destination, ordering each group by position
//! - Materialize ordered, decoded shard groups into staged files

mod grouper;
mod materializer;

pub use grouper::group_by_destination;
pub use materializer::{derive_filename, Materializer};
