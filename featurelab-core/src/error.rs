//! Errors shared by transform construction and pipeline execution.
//!
//! Three distinct failure classes, kept apart on purpose:
//!
//! - [`crate::domain::StructuralError`]: the input series itself is broken
//!   (empty, unordered, non-finite close). Raised at `Series` construction.
//! - [`ParameterError`]: a transform or labeler was configured with values
//!   that can never work (zero window, inverted window pair, bad
//!   threshold). Raised at construction, never mid-run.
//! - Numeric undefinedness (not enough history, zero denominator) is not
//!   an error at all: the affected cell becomes `f64::NAN` (or `None` for
//!   labels) and the run continues.

use thiserror::Error;

/// Invalid construction parameters for a transform or labeler.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("{transform}: {param} must be at least 1")]
    ZeroWindow { transform: &'static str, param: &'static str },

    #[error("horizon_label: threshold must be positive and finite, got {got}")]
    BadThreshold { got: f64 },

    #[error("crossover_label: short window {short} must be smaller than long window {long}")]
    InvertedWindows { short: usize, long: usize },
}

/// Failures while assembling or running a feature pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("transform '{transform}' reads column '{column}', which no earlier transform produces")]
    MissingColumn { transform: String, column: String },

    #[error("column '{column}' would be produced twice")]
    DuplicateColumn { column: String },

    #[error("column '{column}' would shadow a base bar field")]
    ReservedColumn { column: String },

    #[error("column '{column}' has {got} rows, table expects {expected}")]
    LengthMismatch { column: String, got: usize, expected: usize },
}
