//! CSV import/export of raw bars.
//!
//! The offline path: `download` writes these files, `featurize` reads them
//! back, and hand-built fixtures work the same way. Columns are
//! `date,open,high,low,close,volume` with an ISO date, matching the
//! serde shape of [`RawBar`].

use std::path::Path;

use tracing::debug;

use crate::provider::{DataError, RawBar};

/// Read raw bars from a CSV file with a header row.
///
/// Rows come back in file order; canonicalization (sorting, deduping) is
/// deliberately left to [`crate::ingest`].
pub fn read_raw_bars(path: &Path) -> Result<Vec<RawBar>, DataError> {
    let mut reader = ::csv::Reader::from_path(path).map_err(|e| DataError::CsvImport {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut bars = Vec::new();
    for (row, record) in reader.deserialize::<RawBar>().enumerate() {
        let bar = record.map_err(|e| DataError::CsvImport {
            path: path.display().to_string(),
            reason: format!("row {}: {e}", row + 1),
        })?;
        bars.push(bar);
    }

    debug!(path = %path.display(), rows = bars.len(), "read raw bars");
    Ok(bars)
}

/// Write raw bars to a CSV file, overwriting any existing file.
pub fn write_raw_bars(path: &Path, bars: &[RawBar]) -> Result<(), DataError> {
    let mut writer = ::csv::Writer::from_path(path).map_err(|e| DataError::CsvExport {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    for bar in bars {
        writer.serialize(bar).map_err(|e| DataError::CsvExport {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    writer.flush().map_err(|e| DataError::CsvExport {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    debug!(path = %path.display(), rows = bars.len(), "wrote raw bars");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .subsec_nanos();
        std::env::temp_dir().join(format!("featurelab_{tag}_{}_{nanos}.csv", std::process::id()))
    }

    fn sample_bars() -> Vec<RawBar> {
        vec![
            RawBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                open: 100.0,
                high: 102.0,
                low: 99.0,
                close: 101.5,
                volume: 1_000_000,
            },
            RawBar {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                open: 101.5,
                high: 104.0,
                low: 101.0,
                close: 103.0,
                volume: 1_200_000,
            },
        ]
    }

    #[test]
    fn roundtrip_preserves_bars() {
        let path = temp_path("roundtrip");
        let bars = sample_bars();

        write_raw_bars(&path, &bars).unwrap();
        let back = read_raw_bars(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(bars, back);
    }

    #[test]
    fn header_is_written() {
        let path = temp_path("header");
        write_raw_bars(&path, &sample_bars()).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert!(contents.starts_with("date,open,high,low,close,volume"));
        assert!(contents.contains("2024-01-02"));
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let err = read_raw_bars(Path::new("/nonexistent/bars.csv")).unwrap_err();
        assert!(matches!(err, DataError::CsvImport { .. }));
    }

    #[test]
    fn malformed_row_names_its_line() {
        let path = temp_path("malformed");
        fs::write(
            &path,
            "date,open,high,low,close,volume\n2024-01-02,100.0,102.0,99.0,101.5,1000000\nnot-a-date,1,2,3,4,5\n",
        )
        .unwrap();
        let err = read_raw_bars(&path).unwrap_err();
        let _ = fs::remove_file(&path);

        match err {
            DataError::CsvImport { reason, .. } => assert!(reason.contains("row 2")),
            other => panic!("expected CsvImport, got {other:?}"),
        }
    }
}
