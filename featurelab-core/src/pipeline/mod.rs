//! Pipeline: compose causal transforms into a row-aligned feature table.

pub mod builder;
pub mod preset;
pub mod table;

pub use builder::{build_feature_table, FeaturePipeline};
pub use preset::{standard_features, standard_pipeline};
pub use table::{FeatureColumn, FeatureTable, RESERVED_COLUMNS};
