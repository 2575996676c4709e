//! Shard grouping
//!
//! Partitions an arbitrary batch by destination and orders each group.

use std::collections::HashMap;

use contracts::{ShardGroup, ShardRecord};
use tracing::debug;

/// Group a batch of shard records by destination.
///
/// Groups are emitted in first-seen destination order; within each group,
/// records are sorted ascending by position. The sort is stable, so records
/// sharing a position retain their relative input order. `total_count` is
/// not validated here — a partial set still forms a group.
pub fn group_by_destination(records: Vec<ShardRecord>) -> Vec<ShardGroup> {
    let mut groups: Vec<ShardGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        match index.get(&record.destination).copied() {
            Some(i) => groups[i].records.push(record),
            None => {
                index.insert(record.destination.clone(), groups.len());
                groups.push(ShardGroup {
                    destination: record.destination.clone(),
                    records: vec![record],
                });
            }
        }
    }

    for group in &mut groups {
        group.records.sort_by_key(|r| r.position);
    }

    debug!(groups = groups.len(), "batch grouped");
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(destination: &str, position: u32, payload: &str) -> ShardRecord {
        ShardRecord {
            destination: destination.into(),
            position,
            total_count: 2,
            payload: payload.into(),
        }
    }

    #[test]
    fn test_partitions_by_destination() {
        let groups = group_by_destination(vec![
            record("https://x/a.txt", 0, "a0"),
            record("https://x/b.txt", 0, "b0"),
            record("https://x/a.txt", 1, "a1"),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].destination, "https://x/a.txt");
        assert_eq!(groups[0].records.len(), 2);
        assert_eq!(groups[1].destination, "https://x/b.txt");
        assert_eq!(groups[1].records.len(), 1);
    }

    #[test]
    fn test_sorts_ascending_by_position() {
        let groups = group_by_destination(vec![
            record("https://x/a.txt", 2, "a2"),
            record("https://x/a.txt", 0, "a0"),
            record("https://x/a.txt", 1, "a1"),
        ]);

        let positions: Vec<u32> = groups[0].records.iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_equal_positions_keep_input_order() {
        let groups = group_by_destination(vec![
            record("https://x/a.txt", 1, "first"),
            record("https://x/a.txt", 0, "zero"),
            record("https://x/a.txt", 1, "second"),
        ]);

        let payloads: Vec<&str> = groups[0]
            .records
            .iter()
            .map(|r| r.payload.as_str())
            .collect();
        assert_eq!(payloads, vec!["zero", "first", "second"]);
    }

    #[test]
    fn test_empty_batch() {
        assert!(group_by_destination(Vec::new()).is_empty());
    }

    #[test]
    fn test_partial_group_still_forms() {
        // total_count says 2, only one arrived
        let groups = group_by_destination(vec![record("https://x/a.txt", 0, "a0")]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].is_partial());
    }
}
