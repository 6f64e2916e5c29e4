//! Grouped recognition-site storage and persisted group scores.
//!
//! The substrate catalog maps each protease to the distinct recognition sites
//! it is known to cleave. It is loaded once per run from a JSON object and is
//! read-only afterwards:
//!
//! ```json
//! {
//!   "caspase-3": ["DEVDGSAK", "DQTDGSAK"],
//!   "calpain-1": ["PLFAERKA"]
//! }
//! ```
//!
//! The scoring run produces a [`NormalizedScoreTable`], which later ranking runs
//! load and filter with a [`SpecificityFilter`]:
//!
//! ```rust,no_run
//! use sub_cut::catalog::scores::{NormalizedScoreTable, SpecificityFilter};
//! use sub_cut::catalog::store::SubstrateCatalog;
//! use sub_cut::core::config::RankingConfig;
//! use std::path::Path;
//!
//! let catalog = SubstrateCatalog::load_from_file(Path::new("groups.json"), 5_000).unwrap();
//! let table = NormalizedScoreTable::load_from_file(Path::new("scores.json")).unwrap();
//!
//! let filter = SpecificityFilter::from(&RankingConfig::default());
//! let (candidates, summary) = filter.select(&catalog, &table);
//! println!("{} candidate groups, {} below threshold", candidates.len(), summary.below_threshold.len());
//! ```
//!
//! [`NormalizedScoreTable`]: scores::NormalizedScoreTable
//! [`SpecificityFilter`]: scores::SpecificityFilter

pub mod scores;
pub mod store;
