//! Rolling volatility: sample standard deviation of single-period returns.
//!
//! Unbiased estimator (divisor `window - 1`) over the trailing `window`
//! simple returns. A window of returns needs `window + 1` closes, so the
//! first defined row is `window`. A window of 1 has no degrees of freedom
//! and yields an all-missing column.

use crate::domain::Series;
use crate::error::{ParameterError, PipelineError};
use crate::pipeline::{FeatureColumn, FeatureTable};
use crate::transforms::{simple_returns, Transform};

/// Rolling return volatility transform, producing `volatility_{window}`.
#[derive(Debug, Clone)]
pub struct Volatility {
    window: usize,
    name: String,
}

impl Volatility {
    pub fn new(window: usize) -> Result<Self, ParameterError> {
        if window == 0 {
            return Err(ParameterError::ZeroWindow { transform: "volatility", param: "window" });
        }
        Ok(Self { window, name: format!("volatility_{window}") })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Transform for Volatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn lookback(&self) -> usize {
        self.window
    }

    fn apply(
        &self,
        series: &Series,
        _table: &FeatureTable,
    ) -> Result<Vec<FeatureColumn>, PipelineError> {
        let returns = simple_returns(series);
        let n = returns.len();
        let mut values = vec![f64::NAN; n];
        if self.window < 2 {
            return Ok(vec![FeatureColumn::new(&self.name, values)]);
        }

        for i in self.window..n {
            let window = &returns[i + 1 - self.window..=i];
            if window.iter().any(|r| r.is_nan()) {
                continue;
            }
            let mean = window.iter().sum::<f64>() / self.window as f64;
            let ss: f64 = window.iter().map(|r| (r - mean) * (r - mean)).sum();
            values[i] = (ss / (self.window as f64 - 1.0)).sqrt();
        }

        Ok(vec![FeatureColumn::new(&self.name, values)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_support::{assert_approx, assert_warmup, make_series};

    #[test]
    fn rejects_zero_window() {
        assert!(matches!(
            Volatility::new(0),
            Err(ParameterError::ZeroWindow { transform: "volatility", .. })
        ));
    }

    #[test]
    fn two_return_window_known_value() {
        let series = make_series(&[100.0, 110.0, 99.0]);
        let t = Volatility::new(2).unwrap();
        let cols = t.apply(&series, &FeatureTable::new(series.len())).unwrap();
        let values = cols[0].values();

        assert_warmup(values, 2, "volatility_2");
        // Returns are +0.10 and -0.10; sample std = |r1 - r2| / sqrt(2).
        assert_approx(values[2], 0.2 / 2.0f64.sqrt(), "volatility[2]");
        assert_eq!(t.lookback(), 2);
    }

    #[test]
    fn constant_prices_have_zero_volatility() {
        let series = make_series(&[50.0; 30]);
        let t = Volatility::new(10).unwrap();
        let cols = t.apply(&series, &FeatureTable::new(series.len())).unwrap();
        for (i, v) in cols[0].values().iter().enumerate() {
            if i >= 10 {
                assert_approx(*v, 0.0, "flat series volatility");
            }
        }
    }

    #[test]
    fn window_one_has_no_degrees_of_freedom() {
        let series = make_series(&[100.0, 101.0, 102.0, 103.0]);
        let t = Volatility::new(1).unwrap();
        let cols = t.apply(&series, &FeatureTable::new(series.len())).unwrap();
        assert!(cols[0].values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn matches_direct_sample_std() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * (1.0 + 0.01 * (i as f64).sin())).collect();
        let series = make_series(&closes);
        let window = 12;
        let t = Volatility::new(window).unwrap();
        let cols = t.apply(&series, &FeatureTable::new(series.len())).unwrap();

        let rets: Vec<f64> =
            (1..closes.len()).map(|i| closes[i] / closes[i - 1] - 1.0).collect();
        for i in window..closes.len() {
            let w = &rets[i - window..i];
            let mean = w.iter().sum::<f64>() / window as f64;
            let ss: f64 = w.iter().map(|r| (r - mean) * (r - mean)).sum();
            let expected = (ss / (window as f64 - 1.0)).sqrt();
            assert!((cols[0].values()[i] - expected).abs() < 1e-12, "row {i}");
        }
    }

    #[test]
    fn zero_close_poisons_touching_windows() {
        let series = make_series(&[100.0, 0.0, 50.0, 60.0, 70.0, 80.0, 90.0]);
        let t = Volatility::new(2).unwrap();
        let cols = t.apply(&series, &FeatureTable::new(series.len())).unwrap();
        let values = cols[0].values();
        assert!(values[2].is_nan());
        assert!(values[3].is_nan());
        assert!(!values[4].is_nan(), "window past the hole is defined");
    }
}
