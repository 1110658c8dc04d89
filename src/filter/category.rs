//! Remove trade rows whose product falls under excluded categories
//!
//! The exclusion set comes from [`TaxonomyIndex::exclusion_set`]. Each
//! entity's consolidated file is rewritten in place through the tabular
//! store's temp-file-and-rename, so a failure leaves the original intact.

use std::path::Path;

use rustc_hash::FxHashSet;

use super::RowFilter;
use crate::algorithm::batch::{BatchReport, EntityResult, run_per_entity};
use crate::algorithm::consolidate::consolidated_path;
use crate::algorithm::taxonomy::{TaxonomyIndex, load_taxonomy};
use crate::config::PipelineConfig;
use crate::error::{Result, TradeDataError};
use crate::models::TradeRecord;
use crate::utils::io::{read_rows, write_rows};

/// Drops rows whose `product_id` is in the exclusion set
#[derive(Debug, Clone, Default)]
pub struct ProductExclusionFilter {
    excluded: FxHashSet<i64>,
}

impl ProductExclusionFilter {
    #[must_use]
    pub fn new(excluded: FxHashSet<i64>) -> Self {
        Self { excluded }
    }

    #[must_use]
    pub fn from_index(index: &TaxonomyIndex) -> Self {
        Self::new(index.exclusion_set())
    }

    #[must_use]
    pub const fn excluded(&self) -> &FxHashSet<i64> {
        &self.excluded
    }
}

impl RowFilter<TradeRecord> for ProductExclusionFilter {
    fn keep(&self, row: &TradeRecord) -> bool {
        !self.excluded.contains(&row.product_id)
    }
}

/// Filter one consolidated file in place
pub fn filter_consolidated_file(
    path: &Path,
    filter: &ProductExclusionFilter,
    write_index: bool,
) -> Result<EntityResult> {
    if !path.is_file() {
        return Err(TradeDataError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let records: Vec<TradeRecord> = read_rows(path)?;
    let rows_in = records.len();
    let kept = filter.filter(records);
    write_rows(path, &kept, write_index)?;

    log::debug!(
        "{}: removed {} of {rows_in} rows",
        path.display(),
        rows_in - kept.len()
    );
    Ok(EntityResult::Processed {
        inputs: 1,
        rows_in,
        rows_out: kept.len(),
    })
}

/// Apply the category filter to every entity's consolidated file under `root`
///
/// The exclusion set is built from `config.product_path()` and
/// `config.root_categories`.
pub fn exclude_by_product_id(root: &Path, config: &PipelineConfig) -> Result<BatchReport> {
    let index = load_taxonomy(&config.product_path(), &config.root_categories)?;
    let filter = ProductExclusionFilter::from_index(&index);
    exclude_with_filter(root, config, &filter)
}

/// Apply an explicit exclusion filter to every entity under `root`
pub fn exclude_with_filter(
    root: &Path,
    config: &PipelineConfig,
    filter: &ProductExclusionFilter,
) -> Result<BatchReport> {
    run_per_entity(root, config, "exclude_by_product_id", |entity| {
        let path = consolidated_path(entity, config);
        log::info!("{}", path.display());
        filter_consolidated_file(&path, filter, config.write_index)
    })
}
