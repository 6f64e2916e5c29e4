use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::group::SequenceGroup;
use crate::core::summary::OversizedGroup;
use crate::parsing::open_input;
use crate::utils::validation::{check_group_ceiling, normalize_sequence};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Group '{0}' has no sequences")]
    EmptyGroup(String),

    #[error("Group '{group}' has invalid sequence '{sequence}'")]
    InvalidSequence { group: String, sequence: String },

    #[error("Group names must not be empty")]
    EmptyGroupId,

    #[error("Invalid score table: {0}")]
    InvalidScoreTable(String),
}

/// Raw `group -> sequences` entries; a repeated group name is an error
struct GroupEntries(BTreeMap<String, Vec<String>>);

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = GroupEntries;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping group names to lists of sequences")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<GroupEntries, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((id, sequences)) = map.next_entry::<String, Vec<String>>()? {
            if entries.contains_key(&id) {
                return Err(serde::de::Error::custom(format!("duplicate group '{id}'")));
            }
            entries.insert(id, sequences);
        }
        Ok(GroupEntries(entries))
    }
}

impl<'de> Deserialize<'de> for GroupEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// The grouped-sequence table: each enzyme with its distinct recognition sites.
///
/// Groups are kept sorted by id so planning is reproducible. Groups at or above
/// the size ceiling are dropped on load and listed in [`Self::oversized`].
#[derive(Debug, Clone, Default)]
pub struct SubstrateCatalog {
    groups: Vec<SequenceGroup>,
    oversized: Vec<OversizedGroup>,
}

impl SubstrateCatalog {
    /// Build a catalog from raw group → sequences entries.
    ///
    /// Sequences are trimmed, upper-cased and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyGroup` for a group without sequences,
    /// `CatalogError::InvalidSequence` for an unparseable sequence, or
    /// `CatalogError::EmptyGroupId` for a blank group name.
    pub fn from_entries(
        entries: BTreeMap<String, Vec<String>>,
        ceiling: usize,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for (id, raw_sequences) in entries {
            if id.trim().is_empty() {
                return Err(CatalogError::EmptyGroupId);
            }
            if raw_sequences.is_empty() {
                return Err(CatalogError::EmptyGroup(id));
            }

            let sequences = raw_sequences
                .iter()
                .map(|s| {
                    normalize_sequence(s).ok_or_else(|| CatalogError::InvalidSequence {
                        group: id.clone(),
                        sequence: s.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let group = SequenceGroup::new(id, sequences);
            if let Some(reason) = check_group_ceiling(group.len(), ceiling) {
                warn!("Dropping group '{}': {reason}", group.id);
                let size = group.len();
                catalog.oversized.push(OversizedGroup {
                    group: group.id,
                    size,
                });
                continue;
            }
            catalog.groups.push(group);
        }

        debug!(
            "Loaded {} groups ({} sequences), dropped {} oversized",
            catalog.groups.len(),
            catalog.sequence_count(),
            catalog.oversized.len()
        );

        Ok(catalog)
    }

    /// Parse a catalog from a JSON object of group → list of sequences.
    ///
    /// A group name appearing twice is rejected rather than overwritten.
    pub fn from_json(json: &str, ceiling: usize) -> Result<Self, CatalogError> {
        let GroupEntries(entries) = serde_json::from_str(json)?;
        Self::from_entries(entries, ceiling)
    }

    /// Load a catalog from a JSON file, optionally gzipped
    pub fn load_from_file(path: &Path, ceiling: usize) -> Result<Self, CatalogError> {
        let GroupEntries(entries) = serde_json::from_reader(open_input(path)?)?;
        Self::from_entries(entries, ceiling)
    }

    /// Export the retained groups as JSON, keys sorted
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let entries: BTreeMap<&str, &[String]> = self
            .groups
            .iter()
            .map(|g| (g.id.as_str(), g.sequences.as_slice()))
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    /// Retained groups, sorted by id
    #[must_use]
    pub fn groups(&self) -> &[SequenceGroup] {
        &self.groups
    }

    /// Get a group by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SequenceGroup> {
        self.groups
            .binary_search_by(|g| g.id.as_str().cmp(id))
            .ok()
            .map(|idx| &self.groups[idx])
    }

    /// Groups dropped for reaching the size ceiling
    #[must_use]
    pub fn oversized(&self) -> &[OversizedGroup] {
        &self.oversized
    }

    /// Total number of distinct sequences across retained groups
    #[must_use]
    pub fn sequence_count(&self) -> usize {
        self.groups.iter().map(SequenceGroup::len).sum()
    }

    /// Number of retained groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
