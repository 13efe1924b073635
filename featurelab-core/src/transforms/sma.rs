//! Simple Moving Average of the close.
//!
//! Arithmetic mean over a trailing window of `window` rows, the current
//! row included. First defined value at row `window - 1`.

use crate::domain::Series;
use crate::error::{ParameterError, PipelineError};
use crate::pipeline::{FeatureColumn, FeatureTable};
use crate::transforms::Transform;

/// Rolling mean over a raw value slice.
///
/// NaN cells poison every window containing them; the rolling sum tracks
/// them with a counter so contamination never carries past its window.
/// Shared by the [`Sma`] transform and the crossover labeler.
pub fn sma_of_values(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if window == 0 || n < window {
        return out;
    }

    let mut sum = 0.0;
    let mut nan_in_window = 0usize;
    for i in 0..n {
        let v = values[i];
        if v.is_nan() {
            nan_in_window += 1;
        } else {
            sum += v;
        }
        if i >= window {
            let old = values[i - window];
            if old.is_nan() {
                nan_in_window -= 1;
            } else {
                sum -= old;
            }
        }
        if i + 1 >= window && nan_in_window == 0 {
            out[i] = sum / window as f64;
        }
    }
    out
}

/// Simple moving average transform, producing `sma_{window}`.
#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    name: String,
}

impl Sma {
    pub fn new(window: usize) -> Result<Self, ParameterError> {
        if window == 0 {
            return Err(ParameterError::ZeroWindow { transform: "sma", param: "window" });
        }
        Ok(Self { window, name: format!("sma_{window}") })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Transform for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn apply(
        &self,
        series: &Series,
        _table: &FeatureTable,
    ) -> Result<Vec<FeatureColumn>, PipelineError> {
        let closes: Vec<f64> = series.bars().iter().map(|bar| bar.close).collect();
        let values = sma_of_values(&closes, self.window);
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
            Sma::new(0),
            Err(ParameterError::ZeroWindow { transform: "sma", .. })
        ));
    }

    #[test]
    fn column_name_and_lookback() {
        let sma = Sma::new(20).unwrap();
        assert_eq!(sma.name(), "sma_20");
        assert_eq!(sma.output_columns(), vec!["sma_20".to_string()]);
        assert_eq!(sma.lookback(), 19);
        assert!(sma.input_columns().is_empty());
    }

    #[test]
    fn three_day_average() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let sma = Sma::new(3).unwrap();
        let cols = sma.apply(&series, &FeatureTable::new(series.len())).unwrap();
        let values = cols[0].values();

        assert_warmup(values, 2, "sma_3");
        assert_approx(values[2], 20.0, "sma[2]");
        assert_approx(values[3], 30.0, "sma[3]");
        assert_approx(values[4], 40.0, "sma[4]");
    }

    #[test]
    fn window_one_is_identity() {
        let series = make_series(&[10.0, 20.0, 30.0]);
        let sma = Sma::new(1).unwrap();
        let cols = sma.apply(&series, &FeatureTable::new(series.len())).unwrap();
        for (i, bar) in series.bars().iter().enumerate() {
            assert_approx(cols[0].values()[i], bar.close, "sma_1");
        }
    }

    #[test]
    fn window_longer_than_series_is_all_missing() {
        let series = make_series(&[10.0, 20.0, 30.0]);
        let sma = Sma::new(10).unwrap();
        let cols = sma.apply(&series, &FeatureTable::new(series.len())).unwrap();
        assert!(cols[0].values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn nan_input_poisons_only_its_windows() {
        let values = [1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0];
        let out = sma_of_values(&values, 2);
        assert!(out[0].is_nan());
        assert_approx(out[1], 1.5, "clean window");
        assert!(out[2].is_nan(), "window entering NaN");
        assert!(out[3].is_nan(), "window leaving NaN");
        assert_approx(out[4], 4.5, "recovered window");
        assert_approx(out[5], 5.5, "recovered window");
    }

    #[test]
    fn rolling_sum_matches_direct_mean() {
        let closes: Vec<f64> = (1..=100).map(|i| (i as f64).sin() * 10.0 + 50.0).collect();
        let out = sma_of_values(&closes, 7);
        for i in 6..closes.len() {
            let direct: f64 = closes[i - 6..=i].iter().sum::<f64>() / 7.0;
            assert!((out[i] - direct).abs() < 1e-9, "row {i}");
        }
    }
}
