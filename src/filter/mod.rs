//! Row filters applied to trade records
//!
//! A [`RowFilter`] decides per row whether it survives; `filter` keeps the
//! surviving rows in their original order.

pub mod category;
pub mod year;

pub use category::{ProductExclusionFilter, exclude_by_product_id, filter_consolidated_file};
pub use year::YearFilter;

/// Trait for predicates over rows of type `T`
pub trait RowFilter<T>: std::fmt::Debug {
    /// Whether `row` is kept
    fn keep(&self, row: &T) -> bool;

    /// Keep the rows accepted by this filter, preserving order
    fn filter(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter().filter(|row| self.keep(row)).collect()
    }
}
