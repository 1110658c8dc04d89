//! Entity directory and partition file discovery
//!
//! An entity directory `<root>/<E>/` holds per-year partitions named
//! `<E>_<tag>_<year>.csv` and, once merged, a single consolidated file
//! `<E>_<tag>_<span>.csv`.

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::util::validate_directory;
use crate::error::{Result, TradeDataError};
use crate::utils::logging::log_warning;

/// An immediate subdirectory of a batch root, named after its entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDir {
    pub name: String,
    pub path: PathBuf,
}

/// Name of the consolidated file of an entity
#[must_use]
pub fn consolidated_file_name(entity: &str, tag: &str, span: &str) -> String {
    format!("{entity}_{tag}_{span}.csv")
}

/// List the entity directories directly under `root`, sorted by name
///
/// Plain files under `root` are ignored. Directories whose names are not
/// valid UTF-8 are skipped with a warning.
pub fn list_entity_dirs(root: &Path) -> Result<Vec<EntityDir>> {
    validate_directory(root, "entity discovery")?;

    let entries = fs::read_dir(root).map_err(|e| TradeDataError::io(root, e))?;
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TradeDataError::io(root, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => dirs.push(EntityDir { name, path }),
            Err(_) => log_warning("Skipping entity directory with non UTF-8 name", Some(&path)),
        }
    }

    Ok(dirs
        .into_iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect_vec())
}

/// Whether `file_name` is a partition of `entity` for one of `tags`
///
/// Files ending in `_<span>.csv` are consolidated outputs and never match,
/// so a merged file is not read back in on a later run.
#[must_use]
pub fn is_partition_file(file_name: &str, entity: &str, tags: &[String], span: &str) -> bool {
    let matches_prefix = tags
        .iter()
        .any(|tag| file_name.starts_with(&format!("{entity}_{tag}_")));
    matches_prefix && !file_name.ends_with(&format!("_{span}.csv"))
}

/// Find the partition files of one entity, sorted by file name
pub fn find_partition_files(
    entity_dir: &Path,
    entity: &str,
    tags: &[String],
    span: &str,
) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(entity_dir).map_err(|e| TradeDataError::io(entity_dir, e))?;

    let mut partitions = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TradeDataError::io(entity_dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if is_partition_file(name, entity, tags, span) {
            partitions.push(path);
        }
    }

    partitions.sort();
    Ok(partitions)
}
