//! Run artifact export: `features.csv` and `manifest.json`.
//!
//! Every featurize run writes one directory per symbol containing:
//! - `features.csv` — date, close, feature columns in table order, and the
//!   label column when one is configured. Undefined cells (NaN features,
//!   `None` labels) are written as empty fields.
//! - `manifest.json` — row/column accounting, per-column missing counts,
//!   the config hash, and the table fingerprint, so a run can be verified
//!   and reproduced later.
//!
//! Manifests carry a `schema_version` field; unknown versions are rejected
//! on load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use featurelab_core::pipeline::FeatureTable;
use featurelab_core::Series;

use crate::config::RenderedLabels;

/// Manifest schema version. Bump when the manifest layout changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Label accounting recorded in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelSummary {
    pub name: String,
    pub defined: usize,
    pub missing: usize,
}

/// Sidecar metadata for one exported feature table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub schema_version: u32,
    pub symbol: String,
    /// Where the bars came from ("yahoo_finance", "csv", "synthetic").
    pub source: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Rows in the full table, warmup included.
    pub rows: usize,
    /// Rows actually written to `features.csv`.
    pub exported_rows: usize,
    /// Leading rows on which at least one feature is still undefined.
    pub warmup_rows: usize,
    pub drop_warmup: bool,
    /// Feature column names in table order.
    pub columns: Vec<String>,
    /// Undefined cells per feature column, over the full table.
    pub missing_counts: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelSummary>,
    pub config_hash: String,
    pub table_fingerprint: String,
    pub generated_at: String,
}

/// Render the feature table as CSV, skipping the first `skip_rows` rows.
///
/// Column order is date, close, then the table's columns in insertion
/// order, then the label. NaN cells and `None` labels become empty fields.
pub fn export_features_csv(
    series: &Series,
    table: &FeatureTable,
    labels: Option<&RenderedLabels>,
    skip_rows: usize,
) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = vec!["date", "close"];
    header.extend(table.column_names());
    if let Some(rendered) = labels {
        header.push(&rendered.name);
    }
    wtr.write_record(&header)?;

    for (row, bar) in series.bars().iter().enumerate().skip(skip_rows) {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(bar.date.to_string());
        record.push(format_cell(bar.close));
        for column in table.columns() {
            record.push(format_cell(column.values()[row]));
        }
        if let Some(rendered) = labels {
            record.push(rendered.values[row].clone().unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Shortest round-trip rendering for defined values, empty for undefined.
fn format_cell(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Assembles the manifest for one run.
pub fn build_manifest(
    source: &str,
    series: &Series,
    table: &FeatureTable,
    labels: Option<&RenderedLabels>,
    config_hash: String,
    drop_warmup: bool,
) -> Manifest {
    let rows = table.n_rows();
    let warmup_rows = table.first_complete_row().unwrap_or(rows);
    let exported_rows = if drop_warmup { rows - warmup_rows } else { rows };

    let missing_counts = table
        .columns()
        .iter()
        .map(|column| (column.name().to_string(), column.missing_count()))
        .collect();

    Manifest {
        schema_version: SCHEMA_VERSION,
        symbol: series.symbol().to_string(),
        source: source.to_string(),
        start_date: series.first_date(),
        end_date: series.last_date(),
        rows,
        exported_rows,
        warmup_rows,
        drop_warmup,
        columns: table.column_names().map(str::to_string).collect(),
        missing_counts,
        label: labels.map(|rendered| LabelSummary {
            name: rendered.name.clone(),
            defined: rendered.defined_count(),
            missing: rendered.values.len() - rendered.defined_count(),
        }),
        config_hash,
        table_fingerprint: table.fingerprint().to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

/// Writes `features.csv` and `manifest.json` under `out_dir/{symbol}/`.
///
/// The directory is keyed by symbol alone so reruns overwrite in place;
/// the manifest's config hash and fingerprint say whether anything changed.
pub fn save_run(
    out_dir: &Path,
    csv_text: &str,
    manifest: &Manifest,
) -> Result<PathBuf> {
    let run_dir = out_dir.join(&manifest.symbol);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create output dir: {}", run_dir.display()))?;

    std::fs::write(run_dir.join("features.csv"), csv_text)
        .with_context(|| format!("failed to write features.csv in {}", run_dir.display()))?;

    let json = serde_json::to_string_pretty(manifest).context("failed to serialize manifest")?;
    std::fs::write(run_dir.join("manifest.json"), json)
        .with_context(|| format!("failed to write manifest.json in {}", run_dir.display()))?;

    Ok(run_dir)
}

/// Loads a manifest from a run directory, rejecting unknown schema versions.
pub fn load_manifest(dir: &Path) -> Result<Manifest> {
    let path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let manifest: Manifest =
        serde_json::from_str(&json).context("failed to deserialize manifest")?;
    if manifest.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}
