//! Single-year extraction into the fixed trade layout

use std::path::Path;

use crate::error::{Result, TradeDataError};
use crate::filter::{RowFilter, YearFilter};
use crate::models::TradeRecord;
use crate::utils::io::{read_rows, write_rows};

/// Input formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    /// Legacy statistical binary format; recognised but not read
    Stata,
}

impl InputFormat {
    pub fn detect(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("dta") => Ok(Self::Stata),
            _ => Err(TradeDataError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Read trade rows from a supported input file
pub fn read_trade_input(path: &Path) -> Result<Vec<TradeRecord>> {
    match InputFormat::detect(path)? {
        InputFormat::Csv => read_rows(path),
        InputFormat::Stata => Err(TradeDataError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Keep the rows of `year` from `input` and write them to `output`
///
/// Returns the number of rows written.
pub fn convert_to_csv(input: &Path, year: i64, output: &Path, write_index: bool) -> Result<usize> {
    let records = read_trade_input(input)?;
    let total = records.len();
    let kept = YearFilter::new(year).filter(records);
    log::info!(
        "Keeping {} of {total} rows for year {year} from {}",
        kept.len(),
        input.display()
    );
    write_rows(output, &kept, write_index)?;
    Ok(kept.len())
}
