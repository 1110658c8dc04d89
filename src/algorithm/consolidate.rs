//! Merge per-year partition files into one file per entity
//!
//! For an entity directory `<root>/<E>/`, every `<E>_<tag>_*.csv` partition
//! is read, the rows are concatenated in file-name order, and the result is
//! written to `<E>_<consolidated_tag>_<span>.csv`. The partitions are removed
//! only after the consolidated file has been persisted; a read failure
//! leaves every file of the entity as it was.
//!
//! An entity with no partitions is skipped and its consolidated file is not
//! touched, so running the step again after a successful run is a no-op.
//! Partitions found next to an existing consolidated file fail the entity:
//! they may be leftovers of an interrupted run whose rows are already merged,
//! and rewriting the output from them alone would drop the rest.

use std::path::{Path, PathBuf};

use crate::algorithm::batch::{BatchReport, EntityResult, run_per_entity};
use crate::config::PipelineConfig;
use crate::error::{Result, TradeDataError};
use crate::error::util::safe_remove_file;
use crate::models::TradeRecord;
use crate::utils::io::{
    EntityDir, consolidated_file_name, find_partition_files, read_rows, write_rows,
};
use crate::utils::logging::log_warning;

/// Path of the consolidated file of an entity
#[must_use]
pub fn consolidated_path(entity: &EntityDir, config: &PipelineConfig) -> PathBuf {
    entity.path.join(consolidated_file_name(
        &entity.name,
        &config.consolidated_tag,
        &config.consolidated_span,
    ))
}

/// Read and concatenate partition files in the given order
pub fn concat_partitions(partitions: &[PathBuf]) -> Result<Vec<TradeRecord>> {
    let mut records = Vec::new();
    for partition in partitions {
        let rows: Vec<TradeRecord> = read_rows(partition)?;
        log::debug!("{}: {} rows", partition.display(), rows.len());
        records.extend(rows);
    }
    Ok(records)
}

/// Consolidate the partitions of one entity
pub fn consolidate_entity(entity: &EntityDir, config: &PipelineConfig) -> Result<EntityResult> {
    let partitions = find_partition_files(
        &entity.path,
        &entity.name,
        &config.partition_prefixes,
        &config.consolidated_span,
    )?;

    if partitions.is_empty() {
        log_warning("No partition files to consolidate", Some(&entity.path));
        return Ok(EntityResult::Skipped {
            reason: "no partition files".to_string(),
        });
    }

    let output = consolidated_path(entity, config);
    if output.exists() {
        return Err(TradeDataError::ConsolidationConflict {
            entity: entity.name.clone(),
            output,
        });
    }

    let records = concat_partitions(&partitions)?;
    write_rows(&output, &records, config.write_index)?;

    for partition in &partitions {
        safe_remove_file(partition)?;
    }

    Ok(EntityResult::Processed {
        inputs: partitions.len(),
        rows_in: records.len(),
        rows_out: records.len(),
    })
}

/// Consolidate every entity directory under `root`
pub fn combine_years(root: &Path, config: &PipelineConfig) -> Result<BatchReport> {
    run_per_entity(root, config, "combine_years", |entity| {
        consolidate_entity(entity, config)
    })
}
