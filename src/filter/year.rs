//! Filter trade rows to a single year

use super::RowFilter;
use crate::models::TradeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearFilter {
    year: i64,
}

impl YearFilter {
    #[must_use]
    pub const fn new(year: i64) -> Self {
        Self { year }
    }
}

impl RowFilter<TradeRecord> for YearFilter {
    fn keep(&self, row: &TradeRecord) -> bool {
        row.year == self.year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_matching_year() {
        let rows = vec![
            TradeRecord::new(1, 2, 10, 2011, Some(1.0), None),
            TradeRecord::new(1, 2, 10, 2012, Some(2.0), None),
            TradeRecord::new(1, 3, 11, 2012, Some(3.0), None),
        ];
        let kept = YearFilter::new(2012).filter(rows);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.year == 2012));
        assert_eq!(kept[0].partner_id, 2);
    }
}
