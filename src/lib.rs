//! Batch steps for reshaping per-year, per-country trade tables:
//! consolidation across years, category exclusion by product taxonomy,
//! re-partitioning by location and single-year extraction.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
pub use config::PipelineConfig;
pub use error::{Result, TradeDataError};
pub use models::{Category, Location, TabularRow, TradeRecord, WritableRow};

// Pipeline steps
pub use algorithm::batch::{BatchReport, EntityOutcome, EntityResult};
pub use algorithm::consolidate::{combine_years, consolidate_entity};
pub use algorithm::convert::convert_to_csv;
pub use algorithm::split::{LocationCodes, SplitOutput, split_by_locations, split_in_data_root};
pub use algorithm::taxonomy::{TaxonomyIndex, load_taxonomy, reparent_level4, update_product_ids};
pub use filter::{ProductExclusionFilter, RowFilter, exclude_by_product_id};

// Tabular store
pub use utils::io::{read_rows, write_rows};
