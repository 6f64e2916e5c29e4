use serde::Serialize;
use thiserror::Error;

use crate::core::group::SequenceGroup;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("cannot plan partitions for zero workers")]
    ZeroWorkers,
}

/// The groups assigned to one worker
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    /// Worker index, 0-based
    pub index: usize,

    /// Assigned groups, in input order
    pub groups: Vec<&'a SequenceGroup>,

    /// Sum of the assigned groups' cost estimates
    pub total_cost: u64,
}

impl Partition<'_> {
    fn empty(index: usize) -> Self {
        Self {
            index,
            groups: Vec::new(),
            total_cost: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Serializable summary without the sequences
    #[must_use]
    pub fn stats(&self) -> PartitionStats {
        PartitionStats {
            index: self.index,
            group_count: self.groups.len(),
            estimated_pairs: self.total_cost,
            groups: self.groups.iter().map(|g| g.id.clone()).collect(),
        }
    }
}

/// Per-partition figures reported by the `plan` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    pub index: usize,
    pub group_count: usize,
    pub estimated_pairs: u64,
    pub groups: Vec<String>,
}

/// Assign groups to `worker_count` partitions, balancing estimated pair counts.
///
/// Greedy and online: each group, in input order, goes to the partition with
/// the lowest running total, the lowest index winning ties. Always returns
/// exactly `worker_count` partitions; surplus ones are empty. Zero-cost
/// singletons are still assigned so every group is scored somewhere.
///
/// # Errors
///
/// Returns `PlanError::ZeroWorkers` if `worker_count` is 0.
pub fn plan(groups: &[SequenceGroup], worker_count: usize) -> Result<Vec<Partition<'_>>, PlanError> {
    if worker_count == 0 {
        return Err(PlanError::ZeroWorkers);
    }

    let mut partitions: Vec<Partition<'_>> = (0..worker_count).map(Partition::empty).collect();

    for group in groups {
        // min_by_key keeps the first minimum, so the lowest index wins ties
        let target = partitions
            .iter_mut()
            .min_by_key(|p| p.total_cost)
            .ok_or(PlanError::ZeroWorkers)?;
        target.total_cost += group.cost_estimate();
        target.groups.push(group);
    }

    Ok(partitions)
}

/// Ids of input groups that no partition covers, for plan diagnostics
#[must_use]
pub fn missing_groups<'a>(groups: &'a [SequenceGroup], partitions: &[Partition<'_>]) -> Vec<&'a str> {
    groups
        .iter()
        .filter(|g| {
            !partitions
                .iter()
                .any(|p| p.groups.iter().any(|assigned| assigned.id == g.id))
        })
        .map(|g| g.id.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A group with `n` distinct dummy sequences
    fn sized(id: &str, n: usize) -> SequenceGroup {
        SequenceGroup::new(id, (0..n).map(|i| format!("A{i}")))
    }

    fn ids<'a>(partition: &Partition<'a>) -> Vec<&'a str> {
        partition.groups.iter().map(|g| g.id.as_str()).collect()
    }

    #[test]
    fn test_zero_workers() {
        assert_eq!(plan(&[], 0).unwrap_err(), PlanError::ZeroWorkers);
    }

    #[test]
    fn test_exact_partition_count() {
        let groups = vec![sized("a", 3), sized("b", 2)];
        let partitions = plan(&groups, 5).unwrap();
        assert_eq!(partitions.len(), 5);
        assert_eq!(partitions.iter().filter(|p| p.is_empty()).count(), 3);
        assert!(missing_groups(&groups, &partitions).is_empty());
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let groups = vec![sized("a", 2), sized("b", 2), sized("c", 2)];
        let partitions = plan(&groups, 2).unwrap();
        assert_eq!(ids(&partitions[0]), vec!["a", "c"]);
        assert_eq!(ids(&partitions[1]), vec!["b"]);
    }

    #[test]
    fn test_singletons_cost_nothing_but_are_assigned() {
        let groups = vec![sized("big", 4), sized("s1", 1), sized("s2", 1)];
        let partitions = plan(&groups, 2).unwrap();
        assert_eq!(ids(&partitions[0]), vec!["big"]);
        assert_eq!(ids(&partitions[1]), vec!["s1", "s2"]);
        assert_eq!(partitions[1].total_cost, 0);
    }

    #[test]
    fn test_insertion_order_example() {
        let groups = vec![
            sized("g1", 1),
            sized("g10a", 10),
            sized("g10b", 10),
            sized("g50", 50),
            sized("g200", 200),
        ];
        let partitions = plan(&groups, 2).unwrap();
        assert_eq!(ids(&partitions[0]), vec!["g1", "g10a", "g50"]);
        assert_eq!(partitions[0].total_cost, 1270);
        assert_eq!(ids(&partitions[1]), vec!["g10b", "g200"]);
        assert_eq!(partitions[1].total_cost, 19945);
    }

    #[test]
    fn test_dominant_group_alone_when_first() {
        let groups = vec![
            sized("g200", 200),
            sized("g50", 50),
            sized("g10a", 10),
            sized("g10b", 10),
            sized("g1", 1),
        ];
        let partitions = plan(&groups, 2).unwrap();
        assert_eq!(ids(&partitions[0]), vec!["g200"]);
        assert_eq!(partitions[0].total_cost, 19900);
        assert_eq!(partitions[1].total_cost, 1315);
    }

    #[test]
    fn test_stats() {
        let groups = vec![sized("a", 3)];
        let partitions = plan(&groups, 1).unwrap();
        let stats = partitions[0].stats();
        assert_eq!(stats.group_count, 1);
        assert_eq!(stats.estimated_pairs, 3);
        assert_eq!(stats.groups, vec!["a"]);
    }
}
