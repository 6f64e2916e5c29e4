//! Workload-balanced partitioning and parallel scoring.
//!
//! Scoring a group of `n` sites costs `n·(n−1)/2` pair scores, so group costs
//! span several orders of magnitude. [`plan`] spreads groups over a fixed
//! number of partitions with a greedy, deterministic heuristic, and the
//! [`ScoringCoordinator`] scores each partition on its own worker thread.
//!
//! ```rust
//! use sub_cut::core::group::SequenceGroup;
//! use sub_cut::scheduling::partition::plan;
//!
//! let groups = vec![
//!     SequenceGroup::new("caspase-3", ["DEVDGSAK", "DQTDGSAK", "DEVDAAAK"]),
//!     SequenceGroup::new("calpain-1", ["PLFAERKA"]),
//! ];
//! let partitions = plan(&groups, 2).unwrap();
//! assert_eq!(partitions.len(), 2);
//! assert_eq!(partitions[0].total_cost, 3);
//! ```
//!
//! [`plan`]: partition::plan
//! [`ScoringCoordinator`]: coordinator::ScoringCoordinator

pub mod coordinator;
pub mod partition;
