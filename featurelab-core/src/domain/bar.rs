//! Daily OHLCV bar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of price data for a single instrument.
///
/// The close is the only field the transforms read; the other prices ride
/// along for provenance and for sanity checks at ingest time. Prices are
/// plain `f64` with no missing sentinel at this level: a bar whose close is
/// not finite never makes it into a [`crate::domain::Series`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self { date, open, high, low, close, volume }
    }

    /// True when every price field is a finite number.
    pub fn has_finite_prices(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }

    /// OHLC range check: high tops the range, low bottoms it.
    ///
    /// Bars failing this are still usable (only the close matters
    /// downstream) but ingest logs them.
    pub fn is_sane(&self) -> bool {
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}
