//! Bilateral trade rows.

use serde::Deserialize;

use super::{TabularRow, WritableRow, lenient, opt_field};

/// Fixed column set of every trade file written by the pipeline
pub const TRADE_COLUMNS: [&str; 6] = [
    "location_id",
    "partner_id",
    "product_id",
    "year",
    "export_value",
    "import_value",
];

/// One bilateral trade flow for a product and year
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeRecord {
    #[serde(deserialize_with = "lenient::id")]
    pub location_id: i64,
    #[serde(deserialize_with = "lenient::id")]
    pub partner_id: i64,
    #[serde(deserialize_with = "lenient::id")]
    pub product_id: i64,
    #[serde(deserialize_with = "lenient::id")]
    pub year: i64,
    pub export_value: Option<f64>,
    pub import_value: Option<f64>,
}

impl TradeRecord {
    #[must_use]
    pub const fn new(
        location_id: i64,
        partner_id: i64,
        product_id: i64,
        year: i64,
        export_value: Option<f64>,
        import_value: Option<f64>,
    ) -> Self {
        Self {
            location_id,
            partner_id,
            product_id,
            year,
            export_value,
            import_value,
        }
    }
}

impl TabularRow for TradeRecord {
    const COLUMNS: &'static [&'static str] = &TRADE_COLUMNS;
}

impl WritableRow for TradeRecord {
    fn to_fields(&self) -> Vec<String> {
        vec![
            self.location_id.to_string(),
            self.partner_id.to_string(),
            self.product_id.to_string(),
            self.year.to_string(),
            opt_field(self.export_value.as_ref()),
            opt_field(self.import_value.as_ref()),
        ]
    }
}
