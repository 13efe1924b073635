//! Label constructors: forward-looking training targets.
//!
//! Labels answer "what happened next?" and therefore read rows after `i`.
//! That makes them unusable as features, so they are quarantined here:
//! nothing in [`crate::transforms`] can see them, and they come out as
//! separate [`LabelColumn`]s to be joined to a feature table downstream.
//!
//! Missing labels are `None` (horizon past the end of the series, or an
//! undefined forward return). They mark rows to exclude from training,
//! never rows to default to some class.

pub mod crossover;
pub mod horizon;

pub use crossover::CrossoverLabeler;
pub use horizon::HorizonLabeler;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Two-class regime alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryLabel {
    Bullish,
    NonBullish,
}

impl fmt::Display for BinaryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryLabel::Bullish => write!(f, "bullish"),
            BinaryLabel::NonBullish => write!(f, "non_bullish"),
        }
    }
}

/// Three-class regime alphabet with a neutral band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TernaryLabel {
    Bull,
    Bear,
    Range,
}

impl fmt::Display for TernaryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryLabel::Bull => write!(f, "bull"),
            TernaryLabel::Bear => write!(f, "bear"),
            TernaryLabel::Range => write!(f, "range"),
        }
    }
}

/// A named categorical column, row-aligned with its source series.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelColumn<L> {
    name: String,
    values: Vec<Option<L>>,
}

impl<L: Copy> LabelColumn<L> {
    pub(crate) fn new(name: impl Into<String>, values: Vec<Option<L>>) -> Self {
        Self { name: name.into(), values }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Option<L>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<L> {
        self.values.get(row).copied().flatten()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_column_accounting() {
        let col = LabelColumn::new(
            "label_5d",
            vec![Some(BinaryLabel::Bullish), None, Some(BinaryLabel::NonBullish)],
        );
        assert_eq!(col.name(), "label_5d");
        assert_eq!(col.len(), 3);
        assert_eq!(col.defined_count(), 2);
        assert_eq!(col.missing_count(), 1);
        assert_eq!(col.get(0), Some(BinaryLabel::Bullish));
        assert_eq!(col.get(1), None);
        assert_eq!(col.get(99), None);
    }

    #[test]
    fn display_forms_are_snake_case() {
        assert_eq!(BinaryLabel::Bullish.to_string(), "bullish");
        assert_eq!(BinaryLabel::NonBullish.to_string(), "non_bullish");
        assert_eq!(TernaryLabel::Bull.to_string(), "bull");
        assert_eq!(TernaryLabel::Bear.to_string(), "bear");
        assert_eq!(TernaryLabel::Range.to_string(), "range");
    }

    #[test]
    fn serde_matches_display() {
        let json = serde_json::to_string(&TernaryLabel::Range).unwrap();
        assert_eq!(json, "\"range\"");
        let back: TernaryLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TernaryLabel::Range);
    }
}
