use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::store::{CatalogError, SubstrateCatalog};
use crate::core::config::RankingConfig;
use crate::core::group::SequenceGroup;
use crate::parsing::open_input;

/// Normalized group similarity, persisted between the scoring and ranking runs.
///
/// Serializes to exactly two keys: `scored` (group → value in [0, 1]) and
/// `singleton` (list of single-site groups).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizedScoreTable {
    pub scored: BTreeMap<String, f64>,
    pub singleton: BTreeSet<String>,
}

impl NormalizedScoreTable {
    /// Parse and validate a table from JSON
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a JSON file, optionally gzipped
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let table: Self = serde_json::from_reader(open_input(path)?)?;
        table.validate()?;
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the table as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        std::fs::write(path, self.to_json()? + "\n")?;
        Ok(())
    }

    /// Check values lie in [0, 1] and no group is both scored and singleton
    fn validate(&self) -> Result<(), CatalogError> {
        if let Some((group, value)) = self
            .scored
            .iter()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(CatalogError::InvalidScoreTable(format!(
                "group '{group}' has score {value} outside [0, 1]"
            )));
        }
        if let Some(group) = self.singleton.iter().find(|g| self.scored.contains_key(*g)) {
            return Err(CatalogError::InvalidScoreTable(format!(
                "group '{group}' is listed as both scored and singleton"
            )));
        }
        Ok(())
    }
}

/// Why groups were left out of the ranking candidates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub selected: usize,
    pub below_threshold: Vec<String>,
    pub singletons_skipped: Vec<String>,
    pub denylisted: Vec<String>,
    /// Catalog groups with no entry in the score table
    pub unscored: Vec<String>,
}

/// Selects the groups specific enough to rank against queries
#[derive(Debug, Clone)]
pub struct SpecificityFilter {
    pub threshold: f64,
    pub include_singletons: bool,
    pub denylist: BTreeSet<String>,
}

impl From<&RankingConfig> for SpecificityFilter {
    fn from(config: &RankingConfig) -> Self {
        Self {
            threshold: config.specificity_threshold,
            include_singletons: config.include_singletons,
            denylist: config.denylist.iter().cloned().collect(),
        }
    }
}

impl SpecificityFilter {
    /// Keep scored groups at or above the threshold, plus singletons when enabled.
    ///
    /// Denylisted groups are dropped even when they are singletons. Groups in
    /// catalog order.
    pub fn select<'a>(
        &self,
        catalog: &'a SubstrateCatalog,
        table: &NormalizedScoreTable,
    ) -> (Vec<&'a SequenceGroup>, FilterSummary) {
        let mut selected = Vec::new();
        let mut summary = FilterSummary::default();

        for group in catalog.groups() {
            let id = &group.id;
            if self.denylist.contains(id) {
                warn!("Excluding denylisted group '{id}'");
                summary.denylisted.push(id.clone());
            } else if table.singleton.contains(id) {
                if self.include_singletons {
                    selected.push(group);
                } else {
                    summary.singletons_skipped.push(id.clone());
                }
            } else if let Some(&value) = table.scored.get(id) {
                if value >= self.threshold {
                    selected.push(group);
                } else {
                    summary.below_threshold.push(id.clone());
                }
            } else {
                warn!("Group '{id}' has no normalized score, skipping");
                summary.unscored.push(id.clone());
            }
        }

        summary.selected = selected.len();
        debug!(
            "Selected {} groups (threshold {}, {} below, {} denylisted)",
            summary.selected,
            self.threshold,
            summary.below_threshold.len(),
            summary.denylisted.len()
        );

        (selected, summary)
    }
}
