//! Validated, ordered bar series for a single symbol.

use crate::domain::Bar;
use chrono::NaiveDate;
use thiserror::Error;

/// Structural defects that make a bar series unusable as pipeline input.
///
/// These are checked once at construction and abort before any transform
/// runs; transforms may therefore assume well-formed input.
#[derive(Debug, Error)]
pub enum StructuralError {
    #[error("series '{symbol}' has no rows")]
    Empty { symbol: String },

    #[error("series '{symbol}' dates not strictly increasing at row {row}: {prev} then {next}")]
    OutOfOrder { symbol: String, row: usize, prev: NaiveDate, next: NaiveDate },

    #[error("series '{symbol}' close is not a finite number at row {row} ({date})")]
    BadClose { symbol: String, row: usize, date: NaiveDate },
}

/// An immutable run of daily bars in strictly increasing date order.
///
/// Calendar gaps are expected (weekends, holidays, halts): an absent
/// trading day is simply an absent row, and all window arithmetic counts
/// rows, not calendar days. Duplicate dates are rejected here; collapsing
/// them is the ingest layer's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    /// Validates and wraps `bars`. Rejects empty input, out-of-order or
    /// duplicate dates, and any bar without a finite close.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, StructuralError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(StructuralError::Empty { symbol });
        }
        for (row, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() {
                return Err(StructuralError::BadClose { symbol, row, date: bar.date });
            }
            if row > 0 && bars[row - 1].date >= bar.date {
                return Err(StructuralError::OutOfOrder {
                    symbol,
                    row,
                    prev: bars[row - 1].date,
                    next: bar.date,
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of rows. Always at least 1.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Bar> {
        self.bars.get(row)
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, n).unwrap()
    }

    fn bar(date: NaiveDate, close: f64) -> Bar {
        Bar::new(date, close, close, close, close, 1000.0)
    }

    #[test]
    fn valid_series_constructs() {
        let series =
            Series::new("SPY", vec![bar(day(2), 100.0), bar(day(3), 101.0), bar(day(5), 99.5)])
                .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.symbol(), "SPY");
        assert_eq!(series.first_date(), day(2));
        assert_eq!(series.last_date(), day(5));
    }

    #[test]
    fn calendar_gaps_are_fine() {
        // Friday then Monday: no weekend rows, still valid.
        let series = Series::new("SPY", vec![bar(day(5), 100.0), bar(day(8), 101.0)]).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn empty_series_rejected() {
        let err = Series::new("SPY", vec![]).unwrap_err();
        assert!(matches!(err, StructuralError::Empty { .. }));
    }

    #[test]
    fn out_of_order_dates_rejected() {
        let err =
            Series::new("SPY", vec![bar(day(3), 100.0), bar(day(2), 101.0)]).unwrap_err();
        match err {
            StructuralError::OutOfOrder { row, prev, next, .. } => {
                assert_eq!(row, 1);
                assert_eq!(prev, day(3));
                assert_eq!(next, day(2));
            }
            other => panic!("expected OutOfOrder, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_dates_rejected() {
        let err =
            Series::new("SPY", vec![bar(day(2), 100.0), bar(day(2), 101.0)]).unwrap_err();
        assert!(matches!(err, StructuralError::OutOfOrder { row: 1, .. }));
    }

    #[test]
    fn nan_close_rejected() {
        let mut bad = bar(day(3), 100.0);
        bad.close = f64::NAN;
        let err = Series::new("SPY", vec![bar(day(2), 100.0), bad]).unwrap_err();
        assert!(matches!(err, StructuralError::BadClose { row: 1, .. }));
    }

    #[test]
    fn infinite_close_rejected() {
        let mut bad = bar(day(3), 100.0);
        bad.close = f64::INFINITY;
        let err = Series::new("SPY", vec![bar(day(2), 100.0), bad]).unwrap_err();
        assert!(matches!(err, StructuralError::BadClose { row: 1, .. }));
    }

    #[test]
    fn nan_in_other_fields_is_allowed() {
        // Only the close is load-bearing; a broken open rides along.
        let mut odd = bar(day(3), 100.0);
        odd.open = f64::NAN;
        let series = Series::new("SPY", vec![bar(day(2), 100.0), odd]).unwrap();
        assert_eq!(series.len(), 2);
    }
}
