//! Causal feature transforms over a bar series.
//!
//! Every transform is a pure function of the series-so-far: the value at
//! row `i` depends only on rows `0..=i`. Anything forward-looking belongs
//! in [`crate::labels`], never here.
//!
//! | Transform          | Output column(s)        | First defined row |
//! |--------------------|-------------------------|-------------------|
//! | [`Sma`]            | `sma_{window}`          | `window - 1`      |
//! | [`Ema`]            | `ema_{span}`            | `0`               |
//! | [`Returns`]        | `return`, `log_return`  | `1`               |
//! | [`CumulativeReturn`] | `cum_return_{period}` | `period`          |
//! | [`Volatility`]     | `volatility_{window}`   | `window`          |
//! | [`Distance`]       | `dist_{source}`         | source's          |
//! | [`Rsi`]            | `rsi_{period}`          | `period`          |
//!
//! # Missing-value semantics
//!
//! A cell is missing when the transform cannot define it: not enough
//! history for the window, a zero denominator, a non-positive ratio under
//! a log, or a missing input cell. Missing is always `f64::NAN`, never
//! zero, and each transform checks its inputs with `is_nan` before using
//! them, so missingness propagates instead of contaminating arithmetic
//! silently.

pub mod cumulative;
pub mod distance;
pub mod ema;
pub mod returns;
pub mod rsi;
pub mod sma;
pub mod volatility;

pub use cumulative::CumulativeReturn;
pub use distance::Distance;
pub use ema::{ema_of_values, Ema};
pub use returns::{Returns, LOG_RETURN_COLUMN, RETURN_COLUMN};
pub use rsi::Rsi;
pub use sma::{sma_of_values, Sma};
pub use volatility::Volatility;

use crate::domain::Series;
use crate::error::PipelineError;
use crate::pipeline::{FeatureColumn, FeatureTable};

/// A causal, row-aligned feature computation.
///
/// Transforms are stateless between runs and safe to share across threads;
/// a pipeline applies them in sequence, each seeing the table built by its
/// predecessors.
pub trait Transform: Send + Sync {
    /// Short name for error messages and logs, e.g. `"sma_20"`.
    fn name(&self) -> &str;

    /// Names of the columns `apply` will produce, in order.
    fn output_columns(&self) -> Vec<String>;

    /// Names of previously produced columns this transform reads.
    ///
    /// The pipeline checks these exist before anything runs. Most
    /// transforms read only the series and leave this empty.
    fn input_columns(&self) -> Vec<String> {
        Vec::new()
    }

    /// Rows at the start of the series that are structurally missing
    /// because the transform has not seen enough history yet.
    ///
    /// Transforms that inherit their warmup from an input column (such as
    /// [`Distance`]) report 0 here; the pipeline-wide warmup is the
    /// maximum over all transforms, which already accounts for the source.
    fn lookback(&self) -> usize;

    /// Computes the output columns for `series`.
    ///
    /// `table` holds the columns produced by earlier transforms; only the
    /// names declared in [`Transform::input_columns`] may be read from it.
    /// Each returned column must have exactly `series.len()` cells.
    fn apply(&self, series: &Series, table: &FeatureTable)
        -> Result<Vec<FeatureColumn>, PipelineError>;
}

/// Single-period simple returns of the close, NaN at row 0 and wherever
/// the previous close is zero. Shared by the transforms that window over
/// returns rather than prices.
pub(crate) fn simple_returns(series: &Series) -> Vec<f64> {
    let bars = series.bars();
    let mut returns = vec![f64::NAN; bars.len()];
    for i in 1..bars.len() {
        let prev = bars[i - 1].close;
        if prev != 0.0 {
            returns[i] = bars[i].close / prev - 1.0;
        }
    }
    returns
}
