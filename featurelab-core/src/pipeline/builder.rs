//! Pipeline assembly and execution.
//!
//! All wiring mistakes surface when the pipeline is built, not mid-run:
//! every declared input must be produced by an earlier transform, no two
//! transforms may emit the same column, and nothing may shadow a base bar
//! field. Running the validated pipeline applies the transforms in order
//! over a growing table, so each transform sees exactly its predecessors'
//! output.

use std::collections::HashSet;
use std::fmt;

use crate::domain::Series;
use crate::error::PipelineError;
use crate::pipeline::table::{FeatureTable, RESERVED_COLUMNS};
use crate::transforms::Transform;

/// An ordered, validated list of transforms.
pub struct FeaturePipeline {
    transforms: Vec<Box<dyn Transform>>,
}

impl fmt::Debug for FeaturePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeaturePipeline")
            .field("transforms", &self.transforms.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl FeaturePipeline {
    /// Validates the wiring of `transforms` in their given order.
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Result<Self, PipelineError> {
        let mut produced: HashSet<String> = HashSet::new();
        for transform in &transforms {
            for input in transform.input_columns() {
                if !produced.contains(&input) {
                    return Err(PipelineError::MissingColumn {
                        transform: transform.name().to_string(),
                        column: input,
                    });
                }
            }
            for output in transform.output_columns() {
                if RESERVED_COLUMNS.contains(&output.as_str()) {
                    return Err(PipelineError::ReservedColumn { column: output });
                }
                if !produced.insert(output.clone()) {
                    return Err(PipelineError::DuplicateColumn { column: output });
                }
            }
        }
        Ok(Self { transforms })
    }

    pub fn transforms(&self) -> &[Box<dyn Transform>] {
        &self.transforms
    }

    /// Names of every column the pipeline will produce, in table order.
    pub fn output_columns(&self) -> Vec<String> {
        self.transforms.iter().flat_map(|t| t.output_columns()).collect()
    }

    /// Rows at the start of the output that cannot all be defined: the
    /// maximum lookback over the transforms. Warmup-inheriting transforms
    /// report 0 and are covered by their source's entry in the maximum.
    pub fn warmup(&self) -> usize {
        self.transforms.iter().map(|t| t.lookback()).max().unwrap_or(0)
    }

    /// Runs every transform over `series` and collects the table.
    ///
    /// Deterministic: same series and transforms, same table, bit for bit.
    pub fn run(&self, series: &Series) -> Result<FeatureTable, PipelineError> {
        let mut table = FeatureTable::new(series.len());
        for transform in &self.transforms {
            let columns = transform.apply(series, &table)?;
            for column in columns {
                table.insert(column)?;
            }
        }
        Ok(table)
    }
}

/// Build a feature table by running `transforms` in order over `series`.
///
/// One-shot form of [`FeaturePipeline::new`] + [`FeaturePipeline::run`].
pub fn build_feature_table(
    series: &Series,
    transforms: Vec<Box<dyn Transform>>,
) -> Result<FeatureTable, PipelineError> {
    FeaturePipeline::new(transforms)?.run(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::test_support::make_series;
    use crate::transforms::{Distance, Ema, Returns, Sma};

    #[test]
    fn validates_inputs_before_running() {
        // dist_sma_10 declared before anything produces sma_10.
        let err = FeaturePipeline::new(vec![Box::new(Distance::new("sma_10"))]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingColumn { ref column, .. } if column == "sma_10"
        ));
    }

    #[test]
    fn input_produced_later_still_fails() {
        let err = FeaturePipeline::new(vec![
            Box::new(Distance::new("sma_10")),
            Box::new(Sma::new(10).unwrap()),
        ])
        .unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { .. }));
    }

    #[test]
    fn duplicate_outputs_rejected_at_build() {
        let err = FeaturePipeline::new(vec![
            Box::new(Sma::new(10).unwrap()),
            Box::new(Sma::new(10).unwrap()),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::DuplicateColumn { ref column } if column == "sma_10"
        ));
    }

    #[test]
    fn ordered_dependency_runs() {
        let series = make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let table = build_feature_table(
            &series,
            vec![Box::new(Sma::new(2).unwrap()), Box::new(Distance::new("sma_2"))],
        )
        .unwrap();

        assert_eq!(table.n_columns(), 2);
        assert!(table.contains("sma_2"));
        assert!(table.contains("dist_sma_2"));
        assert_eq!(table.n_rows(), 5);
    }

    #[test]
    fn warmup_is_max_lookback() {
        let pipeline = FeaturePipeline::new(vec![
            Box::new(Ema::new(20).unwrap()),
            Box::new(Sma::new(50).unwrap()),
            Box::new(Returns::new()),
        ])
        .unwrap();
        assert_eq!(pipeline.warmup(), 49);
    }

    #[test]
    fn empty_pipeline_produces_empty_table() {
        let series = make_series(&[10.0, 20.0]);
        let pipeline = FeaturePipeline::new(vec![]).unwrap();
        assert_eq!(pipeline.warmup(), 0);
        let table = pipeline.run(&series).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn debug_lists_transform_names() {
        let pipeline = FeaturePipeline::new(vec![
            Box::new(Sma::new(10).unwrap()) as Box<dyn Transform>,
            Box::new(Returns::new()),
        ])
        .unwrap();
        let rendered = format!("{pipeline:?}");
        assert!(rendered.contains("sma_10"), "{rendered}");
        assert!(rendered.contains("returns"), "{rendered}");
    }

    #[test]
    fn output_columns_in_table_order() {
        let pipeline = FeaturePipeline::new(vec![
            Box::new(Returns::new()),
            Box::new(Sma::new(3).unwrap()),
        ])
        .unwrap();
        assert_eq!(
            pipeline.output_columns(),
            vec!["return".to_string(), "log_return".to_string(), "sma_3".to_string()]
        );
    }
}
