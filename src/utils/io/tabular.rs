//! Tabular store for comma-separated files with a header row
//!
//! Reads validate the header against the row type's required columns before
//! decoding. Writes go to a temporary file next to the target which is then
//! renamed over it, so the target is never missing or half-written.

use std::fs;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use crate::error::util::safe_open_file;
use crate::error::{Result, TradeDataError};
use crate::models::{TabularRow, WritableRow};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Columns of `required` that are absent from `headers`
#[must_use]
pub fn missing_columns(headers: &csv::StringRecord, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(ToString::to_string)
        .collect()
}

/// Read every row of a delimited file
///
/// Extra columns, such as a leading row-index column, are ignored.
///
/// # Errors
/// `FileNotFound` when the file is missing, `Schema` when a required column
/// is absent and `Parse` for the first row that cannot be decoded.
pub fn read_rows<T: TabularRow>(path: &Path) -> Result<Vec<T>> {
    let start = Instant::now();
    log_operation_start("Reading", path);

    let file = safe_open_file(path, "reading tabular rows")?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| TradeDataError::from_csv(path, e))?
        .clone();
    let missing = missing_columns(&headers, T::COLUMNS);
    if !missing.is_empty() {
        return Err(TradeDataError::Schema {
            path: path.to_path_buf(),
            missing,
        });
    }

    let rows = reader
        .deserialize::<T>()
        .map(|row| row.map_err(|e| TradeDataError::from_csv(path, e)))
        .collect::<Result<Vec<T>>>()?;

    log_operation_complete("read", path, rows.len(), Some(start.elapsed()));
    Ok(rows)
}

/// Write rows to `path`, replacing any existing file atomically
///
/// The header is `T::COLUMNS`. With `write_index` set, an unnamed leading
/// column holds each row's dense zero-based position.
pub fn write_rows<T: WritableRow>(path: &Path, rows: &[T], write_index: bool) -> Result<()> {
    let start = Instant::now();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = tempfile::Builder::new()
        .prefix(".trade-reshape-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| TradeDataError::io(dir, e))?;

    {
        let mut writer = csv::Writer::from_writer(tmp.as_file());

        let mut header: Vec<&str> = Vec::with_capacity(T::COLUMNS.len() + 1);
        if write_index {
            header.push("");
        }
        header.extend_from_slice(T::COLUMNS);
        writer
            .write_record(&header)
            .map_err(|e| TradeDataError::from_csv(path, e))?;

        for (index, row) in rows.iter().enumerate() {
            let mut fields = row.to_fields();
            if write_index {
                fields.insert(0, index.to_string());
            }
            writer
                .write_record(&fields)
                .map_err(|e| TradeDataError::from_csv(path, e))?;
        }
        writer.flush().map_err(|e| TradeDataError::io(tmp.path(), e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| TradeDataError::io(tmp.path(), e))?;

    set_output_permissions(tmp.path(), path)?;
    tmp.persist(path)
        .map_err(|e| TradeDataError::io(path, e.error))?;

    log_operation_complete("wrote", path, rows.len(), Some(start.elapsed()));
    Ok(())
}

/// Give the replacement file the permissions of the file it replaces
///
/// Temporary files are created owner-only; a fresh output gets `0o644`.
fn set_output_permissions(tmp: &Path, target: &Path) -> Result<()> {
    let permissions = match fs::metadata(target) {
        Ok(meta) => meta.permissions(),
        Err(_) => default_permissions(tmp)?,
    };
    fs::set_permissions(tmp, permissions).map_err(|e| TradeDataError::io(tmp, e))
}

#[cfg(unix)]
fn default_permissions(_tmp: &Path) -> Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(tmp: &Path) -> Result<fs::Permissions> {
    fs::metadata(tmp)
        .map(|meta| meta.permissions())
        .map_err(|e| TradeDataError::io(tmp, e))
}
