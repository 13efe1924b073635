//! Canonicalization of raw bars into a validated core series.
//!
//! Providers hand back whatever their source had: rows can arrive
//! unsorted, dated twice, or with holes punched through the prices. The
//! core `Series` constructor rejects all of that outright, so this module
//! repairs what is repairable first: stable sort by date, duplicate dates
//! collapsed keep-first, rows without a finite close dropped. What gets
//! dropped is counted and logged, never silently discarded.

use featurelab_core::domain::{Bar, Series};
use tracing::{info, warn};

use crate::provider::{DataError, RawBar};

/// What canonicalization did to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestReport {
    pub input_rows: usize,
    pub duplicates_dropped: usize,
    pub unusable_dropped: usize,
    pub insane_bars: usize,
    pub output_rows: usize,
}

/// Canonicalize `raw` and build a validated [`Series`] for `symbol`.
///
/// Fails with [`DataError::NoData`] when nothing usable remains.
pub fn series_from_raw(symbol: &str, raw: Vec<RawBar>) -> Result<(Series, IngestReport), DataError> {
    let mut report = IngestReport { input_rows: raw.len(), ..Default::default() };

    let mut rows = raw;
    // Stable sort, then keep-first on equal dates: among duplicates the
    // earliest row in provider order survives.
    rows.sort_by_key(|bar| bar.date);
    let before = rows.len();
    rows.dedup_by_key(|bar| bar.date);
    report.duplicates_dropped = before - rows.len();

    let before = rows.len();
    rows.retain(|bar| bar.close.is_finite());
    report.unusable_dropped = before - rows.len();

    if rows.is_empty() {
        warn!(symbol, report.input_rows, "nothing usable after canonicalization");
        return Err(DataError::NoData { symbol: symbol.to_string() });
    }

    let bars: Vec<Bar> = rows
        .into_iter()
        .map(|raw| Bar {
            date: raw.date,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volume as f64,
        })
        .collect();

    report.insane_bars = bars.iter().filter(|bar| !bar.is_sane()).count();
    if report.insane_bars > 0 {
        warn!(symbol, count = report.insane_bars, "bars with inconsistent OHLC ranges kept");
    }

    let series = Series::new(symbol, bars)?;
    report.output_rows = series.len();
    info!(
        symbol,
        input = report.input_rows,
        output = report.output_rows,
        duplicates = report.duplicates_dropped,
        unusable = report.unusable_dropped,
        "canonicalized series"
    );
    Ok((series, report))
}
