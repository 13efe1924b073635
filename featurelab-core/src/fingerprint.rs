//! Table fingerprinting — deterministic identity for produced feature tables.
//!
//! Rerunning a pipeline on the same series must reproduce the same table
//! bit for bit; the fingerprint is how that gets checked cheaply. It
//! hashes the row count, the column names in table order, and every cell's
//! bit pattern. All NaN encodings collapse to one canonical pattern first,
//! so "missing" hashes the same regardless of which operation produced it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pipeline::FeatureTable;

/// Quiet-NaN bit pattern used for every missing cell during hashing.
const CANONICAL_NAN_BITS: u64 = 0x7ff8_0000_0000_0000;

/// Hex BLAKE3 digest of a feature table's full contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableFingerprint(pub String);

impl TableFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        CANONICAL_NAN_BITS
    } else {
        value.to_bits()
    }
}

/// Fingerprint of `table`: BLAKE3 over shape, names, and cell bits.
///
/// Column names are length-prefixed so adjacent names can never alias
/// across a boundary.
pub fn table_fingerprint(table: &FeatureTable) -> TableFingerprint {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(table.n_rows() as u64).to_le_bytes());
    hasher.update(&(table.n_columns() as u64).to_le_bytes());
    for column in table.columns() {
        hasher.update(&(column.name().len() as u64).to_le_bytes());
        hasher.update(column.name().as_bytes());
        for value in column.values() {
            hasher.update(&canonical_bits(*value).to_le_bytes());
        }
    }
    TableFingerprint(hasher.finalize().to_hex().to_string())
}
