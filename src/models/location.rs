//! Location reference rows.

use serde::Deserialize;

use super::{TabularRow, lenient};

/// Columns required to resolve a location code
pub const LOCATION_COLUMNS: [&str; 2] = ["location_id", "location_code"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    #[serde(deserialize_with = "lenient::id")]
    pub location_id: i64,
    pub location_code: String,
    #[serde(default)]
    pub location_name_short_en: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

impl Location {
    #[must_use]
    pub fn new(location_id: i64, location_code: impl Into<String>) -> Self {
        Self {
            location_id,
            location_code: location_code.into(),
            location_name_short_en: None,
            level: None,
        }
    }
}

impl TabularRow for Location {
    const COLUMNS: &'static [&'static str] = &LOCATION_COLUMNS;
}
