//! FeatureLab core — derived features and training labels for daily bars.
//!
//! The crate splits into two deliberately separated halves:
//!
//! - [`transforms`]: causal feature transforms. The value at row `i` depends
//!   only on rows `0..=i`. Missing values are `f64::NAN` and propagate.
//! - [`labels`]: forward-looking label constructors. These read rows after
//!   `i` by design and produce categorical columns with `Option` missing.
//!
//! [`pipeline`] composes transforms over a validated [`domain::Series`] into
//! a row-aligned [`pipeline::FeatureTable`]; [`fingerprint`] gives produced
//! tables a deterministic identity for reproducibility checks.
//!
//! Data acquisition lives elsewhere (`featurelab-data`); this crate never
//! performs I/O.

pub mod domain;
pub mod error;
pub mod fingerprint;
pub mod labels;
pub mod pipeline;
pub mod transforms;

pub use domain::{Bar, Series, StructuralError};
pub use error::{ParameterError, PipelineError};
pub use pipeline::{build_feature_table, FeatureColumn, FeaturePipeline, FeatureTable};
pub use transforms::Transform;
