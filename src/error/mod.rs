//! Error handling for the trade reshaping pipeline.

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

/// Specialized error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum TradeDataError {
    /// Input or reference file is missing
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Error opening, reading or writing a file
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed row or non-numeric identifier
    #[error("Parse error in {} at line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// Identifier absent from a reference table
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// Required columns absent from a file header
    #[error("Schema error in {}: missing column(s) {}", path.display(), missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },

    /// Input format the pipeline does not read
    #[error("Unsupported input format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Partitions left next to an existing consolidated file
    #[error(
        "Entity '{entity}' already has {} but partition files remain; merge or remove them first",
        output.display()
    )]
    ConsolidationConflict { entity: String, output: PathBuf },

    /// A multi-entity run where some entities failed
    #[error("{failed} of {total} entities failed")]
    Batch { failed: usize, total: usize },

    /// CSV writer/reader error not tied to a specific row
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file could not be decoded
    #[error("Configuration error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl TradeDataError {
    /// Wrap an IO error together with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Convert a CSV decoding error into a row-level parse error
    pub fn from_csv(path: impl AsRef<Path>, error: csv::Error) -> Self {
        let line = error.position().map_or(0, csv::Position::line);
        match error.into_kind() {
            csv::ErrorKind::Io(source) => Self::io(path, source),
            kind => Self::Parse {
                path: path.as_ref().to_path_buf(),
                line,
                message: describe_csv_kind(&kind),
            },
        }
    }

    /// Create a new generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

fn describe_csv_kind(kind: &csv::ErrorKind) -> String {
    match kind {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("field {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        csv::ErrorKind::Utf8 { err, .. } => format!("invalid UTF-8: {err}"),
        other => format!("{other:?}"),
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, TradeDataError>;
