//! Domain types: daily bars and validated bar series.

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::{Series, StructuralError};
