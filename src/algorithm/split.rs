//! Re-partition one trade file by reporting location
//!
//! Rows of `<name>` are written to `<root>/<code>/<code>_<name>`, one file
//! per distinct `location_id`, in the order the locations first appear in the
//! input. The input file is left in place.

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::config::PipelineConfig;
use crate::error::{Result, TradeDataError};
use crate::models::{Location, TradeRecord};
use crate::utils::io::{read_rows, write_rows};

/// One file written by the splitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutput {
    pub location_id: i64,
    pub location_code: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Location code lookup where the first row for an id wins
#[derive(Debug, Clone, Default)]
pub struct LocationCodes {
    codes: FxHashMap<i64, String>,
}

impl LocationCodes {
    #[must_use]
    pub fn new(locations: &[Location]) -> Self {
        let mut codes = FxHashMap::default();
        for location in locations {
            codes
                .entry(location.location_id)
                .or_insert_with(|| location.location_code.clone());
        }
        Self { codes }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let locations: Vec<Location> = read_rows(path)?;
        Ok(Self::new(&locations))
    }

    /// Code usable as a directory name for `location_id`
    pub fn code(&self, location_id: i64) -> Result<&str> {
        let code = self.codes.get(&location_id).ok_or_else(|| {
            TradeDataError::Lookup(format!("location_id {location_id} not in location table"))
        })?;
        if code.is_empty() || code.contains(['/', '\\']) || code == "." || code == ".." {
            return Err(TradeDataError::Lookup(format!(
                "location_id {location_id} has unusable location_code '{code}'"
            )));
        }
        Ok(code)
    }
}

/// Create `dir` (one level) with mode `0o755` unless it already exists
fn ensure_location_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir).map_err(|e| TradeDataError::io(dir, e))
}

/// Split `input` into per-location files under `output_root`
///
/// Every location id is resolved before anything is written, so an unknown
/// id fails the whole call without partial output.
pub fn split_by_locations(
    input: &Path,
    output_root: &Path,
    locations: &LocationCodes,
    write_index: bool,
) -> Result<Vec<SplitOutput>> {
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            TradeDataError::other(format!("Invalid input file name: {}", input.display()))
        })?;

    let records: Vec<TradeRecord> = read_rows(input)?;

    let targets = records
        .iter()
        .map(|r| r.location_id)
        .unique()
        .map(|id| locations.code(id).map(|code| (id, code.to_string())))
        .collect::<Result<Vec<_>>>()?;

    let mut outputs = Vec::with_capacity(targets.len());
    for (location_id, code) in targets {
        log::info!("{code}");
        let rows = records
            .iter()
            .filter(|r| r.location_id == location_id)
            .cloned()
            .collect_vec();

        let dir = output_root.join(&code);
        ensure_location_dir(&dir)?;
        let path = dir.join(format!("{code}_{file_name}"));
        write_rows(&path, &rows, write_index)?;

        outputs.push(SplitOutput {
            location_id,
            location_code: code,
            path,
            rows: rows.len(),
        });
    }
    Ok(outputs)
}

/// Split `<data_root>/<input_name>` using the configured location table
pub fn split_in_data_root(input_name: &str, config: &PipelineConfig) -> Result<Vec<SplitOutput>> {
    let locations = LocationCodes::load(&config.location_path())?;
    let input = config.data_root.join(input_name);
    split_by_locations(&input, &config.data_root, &locations, config.write_index)
}
