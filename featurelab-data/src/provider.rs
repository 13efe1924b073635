//! Data provider trait and structured error types.
//!
//! The `DataProvider` trait abstracts over bar sources (Yahoo Finance, CSV
//! files, synthetic generators) so the pipeline can swap implementations
//! and tests can run offline.

use chrono::NaiveDate;
use featurelab_core::domain::StructuralError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily OHLCV bar straight from a provider, before canonicalization.
///
/// Prices may be NaN here (providers hole-punch halts and partial days);
/// the ingest layer decides what survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no usable rows for symbol '{symbol}'")]
    NoData { symbol: String },

    #[error("csv import failed for {path}: {reason}")]
    CsvImport { path: String, reason: String },

    #[error("csv export failed for {path}: {reason}")]
    CsvExport { path: String, reason: String },

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error("data error: {0}")]
    Other(String),
}

/// A source of daily bars for one symbol over a date range.
///
/// Implementations handle the specifics of their source; canonicalization
/// and validation sit above this trait in [`crate::ingest`].
pub trait DataProvider: Send + Sync {
    /// Short source name for logs and manifests, e.g. `"yahoo_finance"`.
    fn name(&self) -> &str;

    /// Fetch daily bars for `symbol`, both endpoints inclusive.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_bar_serialization_roundtrip() {
        let bar = RawBar {
            date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            open: 101.5,
            high: 103.0,
            low: 100.75,
            close: 102.25,
            volume: 3_210_000,
        };
        let json = serde_json::to_string(&bar).unwrap();
        let back: RawBar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, back);
    }

    #[test]
    fn errors_render_lowercase_messages() {
        let err = DataError::SymbolNotFound { symbol: "NOPE".into() };
        assert_eq!(err.to_string(), "symbol not found: NOPE");
        let err = DataError::NoData { symbol: "SPY".into() };
        assert_eq!(err.to_string(), "no usable rows for symbol 'SPY'");
    }
}
