//! Product category rows of the HS taxonomy.

use serde::Deserialize;

use super::{TabularRow, WritableRow, lenient, opt_field};

pub const CATEGORY_COLUMNS: [&str; 5] = [
    "product_id",
    "hs_product_code",
    "hs_product_name_short_en",
    "level",
    "parent_id",
];

/// A node of the product taxonomy
///
/// `parent_id` is `None` for top-level rows whose parent column is empty.
/// `hs_product_code` and `level` are kept as text so that codes with
/// leading zeros and named levels survive a rewrite unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "lenient::id")]
    pub product_id: i64,
    pub hs_product_code: String,
    pub hs_product_name_short_en: String,
    pub level: String,
    #[serde(deserialize_with = "lenient::opt_id")]
    pub parent_id: Option<i64>,
}

impl Category {
    #[must_use]
    pub fn new(product_id: i64, level: impl Into<String>, parent_id: Option<i64>) -> Self {
        Self {
            product_id,
            hs_product_code: String::new(),
            hs_product_name_short_en: String::new(),
            level: level.into(),
            parent_id,
        }
    }
}

impl TabularRow for Category {
    const COLUMNS: &'static [&'static str] = &CATEGORY_COLUMNS;
}

impl WritableRow for Category {
    fn to_fields(&self) -> Vec<String> {
        vec![
            self.product_id.to_string(),
            self.hs_product_code.clone(),
            self.hs_product_name_short_en.clone(),
            self.level.clone(),
            opt_field(self.parent_id.as_ref()),
        ]
    }
}
