//! FeatureLab data boundary — everything that produces raw bars.
//!
//! The core crate computes over a validated `Series` and never performs
//! I/O; this crate is the collaborator that gets bars into that shape:
//!
//! - [`provider`]: the `DataProvider` trait and structured `DataError`s.
//! - [`yahoo`]: Yahoo Finance v8 chart-API provider (blocking HTTP,
//!   bounded retries).
//! - [`csv`]: raw-bar CSV import/export so pipelines can run offline.
//! - [`synthetic`]: seeded random-walk bars for demos and benches.
//! - [`ingest`]: canonicalization (sort, dedupe, drop unusable rows) and
//!   conversion into a core `Series`.

pub mod csv;
pub mod ingest;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use csv::{read_raw_bars, write_raw_bars};
pub use ingest::{series_from_raw, IngestReport};
pub use provider::{DataError, DataProvider, RawBar};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
