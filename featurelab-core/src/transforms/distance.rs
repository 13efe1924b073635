//! Normalized distance between the close and a previously computed average.
//!
//! `dist_{source}[i] = (close[i] - source[i]) / source[i]`. Positive when
//! price sits above its average. Missing wherever the source cell is
//! missing or zero. This is the one stock transform that reads the feature
//! table instead of the raw series, so its source must be produced by an
//! earlier pipeline stage.

use crate::domain::Series;
use crate::error::PipelineError;
use crate::pipeline::{FeatureColumn, FeatureTable};
use crate::transforms::Transform;

/// Distance-to-average transform, producing `dist_{source}`.
#[derive(Debug, Clone)]
pub struct Distance {
    source: String,
    name: String,
}

impl Distance {
    /// `source` names the column to measure against, e.g. `"sma_50"`.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let name = format!("dist_{source}");
        Self { source, name }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Transform for Distance {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_columns(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn input_columns(&self) -> Vec<String> {
        vec![self.source.clone()]
    }

    /// Zero here: the undefined head is inherited row-wise from the
    /// source column, which reports its own lookback to the pipeline.
    fn lookback(&self) -> usize {
        0
    }

    fn apply(
        &self,
        series: &Series,
        table: &FeatureTable,
    ) -> Result<Vec<FeatureColumn>, PipelineError> {
        let source = table.values(&self.source).ok_or_else(|| PipelineError::MissingColumn {
            transform: self.name.clone(),
            column: self.source.clone(),
        })?;

        let bars = series.bars();
        let mut values = vec![f64::NAN; bars.len()];
        for (i, bar) in bars.iter().enumerate() {
            let avg = source[i];
            if avg.is_nan() || avg == 0.0 {
                continue;
            }
            values[i] = (bar.close - avg) / avg;
        }

        Ok(vec![FeatureColumn::new(&self.name, values)])
    }
}
