use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A named collection of recognition-site sequences cleaved by one enzyme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceGroup {
    /// Enzyme name
    pub id: String,

    /// Distinct motif sequences, upper-case
    pub sequences: Vec<String>,
}

impl SequenceGroup {
    /// Create a group, removing duplicate sequences while keeping first-seen order
    pub fn new(id: impl Into<String>, sequences: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut seen = HashSet::new();
        let mut distinct: Vec<String> = Vec::new();
        for sequence in sequences {
            let sequence = sequence.into();
            if seen.insert(sequence.clone()) {
                distinct.push(sequence);
            }
        }

        Self {
            id: id.into(),
            sequences: distinct,
        }
    }

    /// Number of member sequences
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.sequences.len() == 1
    }

    /// Number of unordered pairs scored for this group, n·(n−1)/2.
    ///
    /// Used for partition planning only.
    #[must_use]
    pub fn cost_estimate(&self) -> u64 {
        pair_count(self.sequences.len())
    }
}

/// Number of unordered pairs among `n` items
#[must_use]
pub fn pair_count(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_removes_duplicates() {
        let group = SequenceGroup::new("caspase-3", ["DEVDGAAA", "DEVDGAAA", "DQTDGSSA"]);
        assert_eq!(group.len(), 2);
        assert_eq!(group.sequences, vec!["DEVDGAAA", "DQTDGSSA"]);
    }

    #[test]
    fn test_new_keeps_first_seen_order_at_scale() {
        let sites: Vec<String> = (0..4_000).map(|i| format!("S{}", i % 1_000)).collect();
        let group = SequenceGroup::new("large", sites);
        assert_eq!(group.len(), 1_000);
        assert_eq!(group.sequences[0], "S0");
        assert_eq!(group.sequences[999], "S999");
    }

    #[test]
    fn test_cost_estimate() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(2), 1);
        assert_eq!(pair_count(10), 45);
        assert_eq!(pair_count(50), 1225);
        assert_eq!(pair_count(200), 19900);

        let group = SequenceGroup::new("a", ["AAAAAAAA", "AAAAAAAT", "AAAAAATT"]);
        assert_eq!(group.cost_estimate(), 3);
        assert!(!group.is_singleton());
    }
}
