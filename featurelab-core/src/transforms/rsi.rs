//! Relative Strength Index over rolling-mean gains and losses.
//!
//! Each daily close change splits into a gain and a loss magnitude; both
//! are averaged with a plain rolling mean over the trailing `period`
//! changes (not Wilder's recursive smoothing). Then
//! `rsi = 100 - 100 / (1 + avg_gain / avg_loss)`, bounded in [0, 100].
//! A window of changes needs `period + 1` closes, so the first defined
//! row is `period`.

use crate::domain::Series;
use crate::error::{ParameterError, PipelineError};
use crate::pipeline::{FeatureColumn, FeatureTable};
use crate::transforms::Transform;

/// Degenerate windows get a pinned value instead of a 0/0: all-gain is
/// 100, all-loss is 0, fully flat is 50.
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    if avg_gain == 0.0 {
        return 0.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

/// Relative Strength Index transform, producing `rsi_{period}`.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, ParameterError> {
        if period == 0 {
            return Err(ParameterError::ZeroWindow { transform: "rsi", param: "period" });
        }
        Ok(Self { period, name: format!("rsi_{period}") })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Transform for Rsi {
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
        let bars = series.bars();
        let n = bars.len();
        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = bars[i].close - bars[i - 1].close;
            if change > 0.0 {
                gains[i] = change;
            } else {
                losses[i] = -change;
            }
        }

        // Windows are summed fresh per row so a one-sided window sums to an
        // exact 0.0 and hits the pinned-value branch.
        let mut values = vec![f64::NAN; n];
        for i in self.period..n {
            let lo = i + 1 - self.period;
            let avg_gain = gains[lo..=i].iter().sum::<f64>() / self.period as f64;
            let avg_loss = losses[lo..=i].iter().sum::<f64>() / self.period as f64;
            values[i] = rsi_value(avg_gain, avg_loss);
        }

        Ok(vec![FeatureColumn::new(&self.name, values)])
    }
}
