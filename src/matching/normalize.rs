use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::debug;

use crate::catalog::scores::NormalizedScoreTable;
use crate::core::types::GroupScore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error(
        "cannot normalize {scored_groups} scored group(s): need at least two distinct scores"
    )]
    DegenerateRange { scored_groups: usize },
}

/// Min-max normalize group scores into [0, 1], keeping singletons apart.
///
/// Degenerate groups are left out of both collections; callers report them
/// through the exclusion summary.
///
/// # Errors
///
/// Returns `NormalizeError::DegenerateRange` if there are no scored groups or
/// every scored group has the same value.
#[allow(clippy::float_cmp)]
pub fn normalize(
    scores: &BTreeMap<String, GroupScore>,
) -> Result<NormalizedScoreTable, NormalizeError> {
    let mut singleton = BTreeSet::new();
    let mut raw = BTreeMap::new();

    for (group, score) in scores {
        match score {
            GroupScore::Scored { mean } => {
                raw.insert(group.clone(), *mean);
            }
            GroupScore::Singleton => {
                singleton.insert(group.clone());
            }
            GroupScore::Degenerate => {}
        }
    }

    let (min, max) = raw
        .values()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if raw.is_empty() || max == min {
        return Err(NormalizeError::DegenerateRange {
            scored_groups: raw.len(),
        });
    }

    debug!("Normalizing {} groups over [{min}, {max}]", raw.len());

    let range = max - min;
    let scored = raw
        .into_iter()
        .map(|(group, v)| (group, (v - min) / range))
        .collect();

    Ok(NormalizedScoreTable { scored, singleton })
}
