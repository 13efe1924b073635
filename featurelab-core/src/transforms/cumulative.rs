//! Compounded return over a trailing window of single-period returns.
//!
//! `cum_return_{p}[i] = prod_{k=i-p+1..=i} (1 + return[k]) - 1`. The
//! product telescopes to `close[i] / close[i-p] - 1` when every close in
//! the window is nonzero, but it is computed from the returns so a zero
//! close anywhere inside the window leaves the cell missing rather than
//! silently spanning it. `return[0]` does not exist, so the first defined
//! row is `period`, not `period - 1`.

use crate::domain::Series;
use crate::error::{ParameterError, PipelineError};
use crate::pipeline::{FeatureColumn, FeatureTable};
use crate::transforms::{simple_returns, Transform};

/// Compounded trailing return transform, producing `cum_return_{period}`.
#[derive(Debug, Clone)]
pub struct CumulativeReturn {
    period: usize,
    name: String,
}

impl CumulativeReturn {
    pub fn new(period: usize) -> Result<Self, ParameterError> {
        if period == 0 {
            return Err(ParameterError::ZeroWindow { transform: "cum_return", param: "period" });
        }
        Ok(Self { period, name: format!("cum_return_{period}") })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Transform for CumulativeReturn {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn apply(
        &self,
        series: &Series,
        _table: &FeatureTable,
    ) -> Result<Vec<FeatureColumn>, PipelineError> {
        let returns = simple_returns(series);
        let n = returns.len();
        let mut values = vec![f64::NAN; n];

        for i in self.period..n {
            let window = &returns[i + 1 - self.period..=i];
            if window.iter().any(|r| r.is_nan()) {
                continue;
            }
            values[i] = window.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0;
        }

        Ok(vec![FeatureColumn::new(&self.name, values)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_support::{assert_approx, assert_warmup, make_series};

    #[test]
    fn rejects_zero_period() {
        assert!(matches!(
            CumulativeReturn::new(0),
            Err(ParameterError::ZeroWindow { transform: "cum_return", .. })
        ));
    }

    #[test]
    fn first_defined_row_is_period() {
        let series = make_series(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let t = CumulativeReturn::new(3).unwrap();
        let cols = t.apply(&series, &FeatureTable::new(series.len())).unwrap();
        assert_warmup(cols[0].values(), 3, "cum_return_3");
        assert_eq!(t.lookback(), 3);
    }

    #[test]
    fn product_telescopes_to_price_ratio() {
        let closes = [100.0, 104.0, 98.0, 109.0, 111.0, 103.0];
        let series = make_series(&closes);
        let t = CumulativeReturn::new(3).unwrap();
        let cols = t.apply(&series, &FeatureTable::new(series.len())).unwrap();
        for i in 3..closes.len() {
            assert_approx(
                cols[0].values()[i],
                closes[i] / closes[i - 3] - 1.0,
                "telescoped ratio",
            );
        }
    }

    #[test]
    fn period_one_equals_simple_return() {
        let series = make_series(&[100.0, 110.0, 99.0]);
        let t = CumulativeReturn::new(1).unwrap();
        let cols = t.apply(&series, &FeatureTable::new(series.len())).unwrap();
        assert!(cols[0].values()[0].is_nan());
        assert_approx(cols[0].values()[1], 0.10, "cum_return_1[1]");
        assert_approx(cols[0].values()[2], 99.0 / 110.0 - 1.0, "cum_return_1[2]");
    }

    #[test]
    fn zero_close_inside_window_leaves_cell_missing() {
        let series = make_series(&[100.0, 0.0, 50.0, 60.0, 70.0, 80.0]);
        let t = CumulativeReturn::new(2).unwrap();
        let cols = t.apply(&series, &FeatureTable::new(series.len())).unwrap();
        let values = cols[0].values();
        // return[2] is missing (divide by zero close), so windows touching
        // row 2 are missing too.
        assert!(values[2].is_nan());
        assert!(values[3].is_nan());
        assert_approx(values[4], 70.0 / 50.0 - 1.0, "window past the hole");
    }
}
