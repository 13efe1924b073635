//! Feature table: named, row-aligned derived columns over one series.

use std::collections::HashMap;

use crate::error::PipelineError;
use crate::fingerprint::{table_fingerprint, TableFingerprint};

/// Base bar fields. Derived columns may not shadow these, so a feature
/// table can always be joined back onto its bars without ambiguity.
pub const RESERVED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// A named numeric column, row-aligned with its source series.
/// `f64::NAN` marks missing cells.
#[derive(Debug, Clone)]
pub struct FeatureColumn {
    name: String,
    values: Vec<f64>,
}

impl FeatureColumn {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), values }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<f64> {
        self.values.get(row).copied()
    }

    /// True when the cell is NaN or the row is out of range.
    pub fn is_missing(&self, row: usize) -> bool {
        self.get(row).map_or(true, f64::is_nan)
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }

    /// Row index of the first defined cell, if any cell is defined.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(|v| !v.is_nan())
    }
}

/// Append-only, insertion-ordered collection of feature columns.
///
/// Inserting never mutates existing columns. Duplicate names, reserved
/// names, and length mismatches are rejected, so every column a consumer
/// reads is exactly `n_rows` long and written exactly once.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    n_rows: usize,
    columns: Vec<FeatureColumn>,
    index: HashMap<String, usize>,
}

impl FeatureTable {
    pub fn new(n_rows: usize) -> Self {
        Self { n_rows, columns: Vec::new(), index: HashMap::new() }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn insert(&mut self, column: FeatureColumn) -> Result<(), PipelineError> {
        if column.len() != self.n_rows {
            return Err(PipelineError::LengthMismatch {
                column: column.name.clone(),
                got: column.len(),
                expected: self.n_rows,
            });
        }
        if RESERVED_COLUMNS.contains(&column.name.as_str()) {
            return Err(PipelineError::ReservedColumn { column: column.name.clone() });
        }
        if self.index.contains_key(&column.name) {
            return Err(PipelineError::DuplicateColumn { column: column.name.clone() });
        }
        self.index.insert(column.name.clone(), self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&FeatureColumn> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    pub fn values(&self, name: &str) -> Option<&[f64]> {
        self.column(name).map(FeatureColumn::values)
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Per-row mask: true where every column has a defined value.
    ///
    /// Downstream consumers use this to drop warmup rows and holes before
    /// training.
    pub fn complete_rows(&self) -> Vec<bool> {
        (0..self.n_rows)
            .map(|row| self.columns.iter().all(|c| !c.values[row].is_nan()))
            .collect()
    }

    /// Index of the first row where every column is defined.
    pub fn first_complete_row(&self) -> Option<usize> {
        (0..self.n_rows).find(|&row| self.columns.iter().all(|c| !c.values[row].is_nan()))
    }

    /// Deterministic content identity. See [`crate::fingerprint`].
    pub fn fingerprint(&self) -> TableFingerprint {
        table_fingerprint(self)
    }
}
