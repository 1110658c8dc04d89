//! Configuration for the trade reshaping pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TradeDataError};
use crate::error::util::safe_open_file;

/// Default data root, relative to the scripts directory
pub const DEFAULT_DATA_ROOT: &str = "../static/data";

/// Stones, Minerals, Vehicles, Machinery, Electronics
pub const DEFAULT_ROOT_CATEGORIES: [i64; 5] = [2, 3, 6, 7, 8];

/// Configuration shared by all pipeline steps
///
/// Every path is explicit; library functions never fall back to the
/// relative data root on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root directory for location splitting and reference tables
    pub data_root: PathBuf,
    /// Location reference table (`location_id`, `location_code`, ...)
    pub location_file: Option<PathBuf>,
    /// Category reference table used by the category filter
    pub product_file: Option<PathBuf>,
    /// Category table read by the taxonomy update
    pub product_source_file: Option<PathBuf>,
    /// Category table written by the taxonomy update
    pub product_output_file: Option<PathBuf>,
    /// Top-level categories whose subtrees are excluded
    pub root_categories: Vec<i64>,
    /// Classification tags matched as `<entity>_<tag>_` partition prefixes
    pub partition_prefixes: Vec<String>,
    /// Classification tag of the consolidated file
    pub consolidated_tag: String,
    /// Year span in the consolidated file name
    pub consolidated_span: String,
    /// Write a leading dense row-index column
    pub write_index: bool,
    /// Process entity directories on a worker pool
    pub parallel: bool,
    /// Worker count when `parallel` is set (defaults to the CPU count)
    pub threads: Option<usize>,
    /// Draw a progress bar over entity directories
    pub progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from(DEFAULT_DATA_ROOT),
            location_file: None,
            product_file: None,
            product_source_file: None,
            product_output_file: None,
            root_categories: DEFAULT_ROOT_CATEGORIES.to_vec(),
            partition_prefixes: vec!["hs2".to_string()],
            consolidated_tag: "hs2".to_string(),
            consolidated_span: "2010_to_2020".to_string(),
            write_index: true,
            parallel: false,
            threads: None,
            progress: false,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; absent keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "pipeline configuration")?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot drive any step
    pub fn validate(&self) -> Result<()> {
        if self.partition_prefixes.is_empty() {
            return Err(TradeDataError::other(
                "partition_prefixes must name at least one classification tag",
            ));
        }
        if self.consolidated_tag.is_empty() || self.consolidated_span.is_empty() {
            return Err(TradeDataError::other(
                "consolidated_tag and consolidated_span must not be empty",
            ));
        }
        if self.threads == Some(0) {
            return Err(TradeDataError::other("threads must be at least 1"));
        }
        Ok(())
    }

    #[must_use]
    pub fn location_path(&self) -> PathBuf {
        self.location_file
            .clone()
            .unwrap_or_else(|| self.data_root.join("location.csv"))
    }

    #[must_use]
    pub fn product_path(&self) -> PathBuf {
        self.product_file
            .clone()
            .unwrap_or_else(|| self.data_root.join("hs_product.csv"))
    }

    #[must_use]
    pub fn product_source_path(&self) -> PathBuf {
        self.product_source_file
            .clone()
            .unwrap_or_else(|| self.data_root.join("hs_product_copy.csv"))
    }

    #[must_use]
    pub fn product_output_path(&self) -> PathBuf {
        self.product_output_file
            .clone()
            .unwrap_or_else(|| self.data_root.join("hs_product_new.csv"))
    }

    /// Worker count for parallel entity processing
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}
