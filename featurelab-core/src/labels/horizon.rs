//! Threshold-horizon labeler.
//!
//! Classifies each row by the return realized `horizon` rows later.
//! Binary: Bullish when the forward return clears `threshold`, NonBullish
//! otherwise. Ternary: Bull above `+threshold`, Bear below `-threshold`,
//! Range inside the symmetric band. The last `horizon` rows of the series
//! have no future to look at and stay unlabeled.

use crate::domain::Series;
use crate::error::ParameterError;
use crate::labels::{BinaryLabel, LabelColumn, TernaryLabel};

/// Forward-return labeler with a fixed horizon and threshold.
#[derive(Debug, Clone)]
pub struct HorizonLabeler {
    horizon: usize,
    threshold: f64,
    use_log: bool,
}

impl HorizonLabeler {
    /// `threshold` is a return magnitude (0.02 means 2%) and must be
    /// positive and finite; a ternary band of zero width would make Range
    /// unreachable and a negative one would invert the classes.
    pub fn new(horizon: usize, threshold: f64, use_log: bool) -> Result<Self, ParameterError> {
        if horizon == 0 {
            return Err(ParameterError::ZeroWindow {
                transform: "horizon_label",
                param: "horizon",
            });
        }
        if !(threshold > 0.0) || !threshold.is_finite() {
            return Err(ParameterError::BadThreshold { got: threshold });
        }
        Ok(Self { horizon, threshold, use_log })
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Return realized between row `i` and row `i + horizon`, or `None`
    /// past the end of the series or where the arithmetic is undefined
    /// (zero base close; non-positive ratio under a log).
    fn forward_return(&self, series: &Series, i: usize) -> Option<f64> {
        let bars = series.bars();
        let j = i.checked_add(self.horizon)?;
        if j >= bars.len() {
            return None;
        }
        let base = bars[i].close;
        if base == 0.0 {
            return None;
        }
        let ratio = bars[j].close / base;
        if self.use_log {
            if ratio <= 0.0 {
                return None;
            }
            Some(ratio.ln())
        } else {
            Some(ratio - 1.0)
        }
    }

    /// Bullish / NonBullish against the threshold.
    pub fn binary(&self, series: &Series) -> LabelColumn<BinaryLabel> {
        let values = (0..series.len())
            .map(|i| {
                self.forward_return(series, i).map(|fwd| {
                    if fwd > self.threshold {
                        BinaryLabel::Bullish
                    } else {
                        BinaryLabel::NonBullish
                    }
                })
            })
            .collect();
        LabelColumn::new(format!("label_{}d", self.horizon), values)
    }

    /// Bull / Bear / Range against the symmetric threshold band.
    pub fn ternary(&self, series: &Series) -> LabelColumn<TernaryLabel> {
        let values = (0..series.len())
            .map(|i| {
                self.forward_return(series, i).map(|fwd| {
                    if fwd > self.threshold {
                        TernaryLabel::Bull
                    } else if fwd < -self.threshold {
                        TernaryLabel::Bear
                    } else {
                        TernaryLabel::Range
                    }
                })
            })
            .collect();
        LabelColumn::new(format!("label_{}d_ternary", self.horizon), values)
    }
}
