//! Row types read from and written to the tabular files.

pub mod category;
pub mod location;
pub mod trade;

pub use category::{CATEGORY_COLUMNS, Category};
pub use location::{LOCATION_COLUMNS, Location};
pub use trade::{TRADE_COLUMNS, TradeRecord};

use serde::de::DeserializeOwned;

/// A row type with a fixed column layout
///
/// `COLUMNS` lists the columns that must be present in a file header for
/// the row to be read.
pub trait TabularRow: DeserializeOwned {
    const COLUMNS: &'static [&'static str];
}

/// A row type the pipeline writes back out, one field per `COLUMNS` entry
pub trait WritableRow: TabularRow {
    /// Field values in `COLUMNS` order
    fn to_fields(&self) -> Vec<String>;
}

/// Lenient identifier decoding
///
/// Identifier columns that went through a float-typed writer arrive as
/// `"2.0"` rather than `"2"`; both decode to the same integer.
pub(crate) mod lenient {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    /// `i64::MIN` and `i64::MAX + 1`, both exact in `f64`
    const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
    const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

    pub fn parse_id(raw: &str) -> Option<i64> {
        let raw = raw.trim();
        raw.parse::<i64>().ok().or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(v))
                .map(|v| v as i64)
        })
    }

    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_id(&raw).ok_or_else(|| D::Error::custom(format!("invalid identifier '{raw}'")))
    }

    pub fn opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        parse_id(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid identifier '{raw}'")))
    }
}

/// Render an optional value, leaving missing values empty
pub(crate) fn opt_field<T: ToString>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}
