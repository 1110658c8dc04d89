//! Utility functions for error handling
//!
//! Path-checked wrappers around filesystem calls so that every failure
//! carries the file or directory it happened on.

use std::fs;
use std::path::Path;

use crate::error::{Result, TradeDataError};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for the debug log)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(TradeDataError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_file() {
        return Err(TradeDataError::other(format!(
            "Expected a file for {purpose}: {}",
            path.display()
        )));
    }

    log::debug!("Opening {} for {purpose}", path.display());
    fs::File::open(path).map_err(|e| TradeDataError::io(path, e))
}

/// Check if a directory exists and is readable
pub fn validate_directory(path: &Path, purpose: &str) -> Result<()> {
    if !path.exists() {
        return Err(TradeDataError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if !path.is_dir() {
        return Err(TradeDataError::other(format!(
            "Expected a directory for {purpose}: {}",
            path.display()
        )));
    }

    fs::read_dir(path)
        .map(|_| ())
        .map_err(|e| TradeDataError::io(path, e))
}

/// Remove a file, reporting the path on failure
pub fn safe_remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|e| TradeDataError::io(path, e))
}
