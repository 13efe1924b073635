//! Single-period simple and logarithmic returns of the close.
//!
//! `return[i] = close[i] / close[i-1] - 1`, `log_return[i] = ln(close[i] /
//! close[i-1])`. Row 0 has no predecessor and is missing in both. A zero
//! previous close leaves both missing; a non-positive price ratio leaves
//! only the log return missing.

use crate::domain::Series;
use crate::error::PipelineError;
use crate::pipeline::{FeatureColumn, FeatureTable};
use crate::transforms::Transform;

pub const RETURN_COLUMN: &str = "return";
pub const LOG_RETURN_COLUMN: &str = "log_return";

/// Produces the `return` and `log_return` columns in one pass.
#[derive(Debug, Clone, Default)]
pub struct Returns;

impl Returns {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for Returns {
    fn name(&self) -> &str {
        "returns"
    }

    fn output_columns(&self) -> Vec<String> {
        vec![RETURN_COLUMN.to_string(), LOG_RETURN_COLUMN.to_string()]
    }

    fn lookback(&self) -> usize {
        1
    }

    fn apply(
        &self,
        series: &Series,
        _table: &FeatureTable,
    ) -> Result<Vec<FeatureColumn>, PipelineError> {
        let bars = series.bars();
        let n = bars.len();
        let mut simple = vec![f64::NAN; n];
        let mut log = vec![f64::NAN; n];

        for i in 1..n {
            let prev = bars[i - 1].close;
            if prev == 0.0 {
                continue;
            }
            let ratio = bars[i].close / prev;
            simple[i] = ratio - 1.0;
            if ratio > 0.0 {
                log[i] = ratio.ln();
            }
        }

        Ok(vec![
            FeatureColumn::new(RETURN_COLUMN, simple),
            FeatureColumn::new(LOG_RETURN_COLUMN, log),
        ])
    }
}
