//! Moving-average crossover labeler.
//!
//! Bullish while the short SMA sits strictly above the long SMA. Both
//! averages only look backward, but the output is a training target, not a
//! feature, so it lives with the label constructors. Rows where either
//! average is still warming up are unlabeled; the first label lands at row
//! `long_window - 1`.

use crate::domain::Series;
use crate::error::ParameterError;
use crate::labels::{BinaryLabel, LabelColumn};
use crate::transforms::sma_of_values;

/// SMA-pair crossover labeler.
///
/// Window order is enforced at construction: an inverted pair would
/// compute without complaint and mean the opposite of what the name says.
#[derive(Debug, Clone)]
pub struct CrossoverLabeler {
    short_window: usize,
    long_window: usize,
}

impl CrossoverLabeler {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, ParameterError> {
        if short_window == 0 {
            return Err(ParameterError::ZeroWindow {
                transform: "crossover_label",
                param: "short_window",
            });
        }
        if short_window >= long_window {
            return Err(ParameterError::InvertedWindows {
                short: short_window,
                long: long_window,
            });
        }
        Ok(Self { short_window, long_window })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    pub fn label(&self, series: &Series) -> LabelColumn<BinaryLabel> {
        let closes: Vec<f64> = series.bars().iter().map(|bar| bar.close).collect();
        let short = sma_of_values(&closes, self.short_window);
        let long = sma_of_values(&closes, self.long_window);

        let values = short
            .iter()
            .zip(&long)
            .map(|(&s, &l)| {
                if s.is_nan() || l.is_nan() {
                    None
                } else if s > l {
                    Some(BinaryLabel::Bullish)
                } else {
                    Some(BinaryLabel::NonBullish)
                }
            })
            .collect();

        LabelColumn::new(
            format!("label_cross_{}_{}", self.short_window, self.long_window),
            values,
        )
    }
}
