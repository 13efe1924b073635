//! Exponential Moving Average of the close.
//!
//! Smoothing factor `alpha = 2 / (span + 1)`. Bias-adjusted: the weights
//! over the observed prefix are renormalized, so the first row is already
//! defined (it equals the first close) and early values are true weighted
//! means rather than artifacts of an arbitrary seed:
//!
//! ```text
//! ema[i] = sum_{k=0..=i} (1-alpha)^k * close[i-k] / sum_{k=0..=i} (1-alpha)^k
//! ```
//!
//! Computed in one pass via paired recursions on numerator and
//! denominator. Lookback: 0.

use crate::domain::Series;
use crate::error::{ParameterError, PipelineError};
use crate::pipeline::{FeatureColumn, FeatureTable};
use crate::transforms::Transform;

/// Bias-adjusted exponential moving average over a raw value slice.
///
/// Missing (NaN) inputs stay missing in the output and leave the
/// recursion state untouched, as if the row were absent.
pub fn ema_of_values(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if span == 0 {
        return out;
    }
    let decay = 1.0 - 2.0 / (span as f64 + 1.0);
    let mut num = 0.0;
    let mut den = 0.0;
    for i in 0..n {
        let v = values[i];
        if v.is_nan() {
            continue;
        }
        num = v + decay * num;
        den = 1.0 + decay * den;
        out[i] = num / den;
    }
    out
}

/// Exponential moving average transform, producing `ema_{span}`.
#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    name: String,
}

impl Ema {
    pub fn new(span: usize) -> Result<Self, ParameterError> {
        if span == 0 {
            return Err(ParameterError::ZeroWindow { transform: "ema", param: "span" });
        }
        Ok(Self { span, name: format!("ema_{span}") })
    }

    pub fn span(&self) -> usize {
        self.span
    }
}

impl Transform for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn lookback(&self) -> usize {
        0
    }

    fn apply(
        &self,
        series: &Series,
        _table: &FeatureTable,
    ) -> Result<Vec<FeatureColumn>, PipelineError> {
        let closes: Vec<f64> = series.bars().iter().map(|bar| bar.close).collect();
        let values = ema_of_values(&closes, self.span);
        Ok(vec![FeatureColumn::new(&self.name, values)])
    }
}
