//! Serializable pipeline configuration.
//!
//! A [`PipelineConfig`] is the on-disk description of a feature run: which
//! transforms to apply, in which order, and which label (if any) to attach.
//! Configs are TOML files; the same struct hashed as canonical JSON gives
//! the content-addressed id recorded in every run manifest.

use featurelab_core::labels::{CrossoverLabeler, HorizonLabeler, LabelColumn};
use featurelab_core::pipeline::preset::{
    DEFAULT_CUMULATIVE_PERIOD, DEFAULT_EMA_SPAN, DEFAULT_FAST_SMA, DEFAULT_RSI_PERIOD,
    DEFAULT_SLOW_SMA, DEFAULT_VOLATILITY_WINDOW,
};
use featurelab_core::transforms::{
    CumulativeReturn, Distance, Ema, Returns, Rsi, Sma, Volatility,
};
use featurelab_core::{ParameterError, Series, Transform};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;

/// Default forward horizon for the standard config's label (trading days).
pub const DEFAULT_LABEL_HORIZON: usize = 10;

/// Default forward-return threshold for the standard config's label.
pub const DEFAULT_LABEL_THRESHOLD: f64 = 0.02;

/// One transform in a pipeline config (serializable enum).
///
/// Variant fields mirror the constructor parameters of the corresponding
/// transform; [`TransformSpec::build`] performs the same validation the
/// constructors do, so a bad window fails before any data is touched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformSpec {
    /// Simple moving average of the close.
    Sma { window: usize },

    /// Exponential moving average of the close.
    Ema { span: usize },

    /// Simple and log one-day returns.
    Returns,

    /// Compounded simple return over a trailing period.
    CumulativeReturn { period: usize },

    /// Rolling standard deviation of one-day returns.
    Volatility { window: usize },

    /// Relative distance of the close to an earlier average column.
    Distance { source: String },

    /// Relative strength index of the close.
    Rsi { period: usize },
}

impl TransformSpec {
    /// Builds the runnable transform this spec describes.
    pub fn build(&self) -> Result<Box<dyn Transform>, ParameterError> {
        Ok(match self {
            TransformSpec::Sma { window } => Box::new(Sma::new(*window)?),
            TransformSpec::Ema { span } => Box::new(Ema::new(*span)?),
            TransformSpec::Returns => Box::new(Returns::new()),
            TransformSpec::CumulativeReturn { period } => {
                Box::new(CumulativeReturn::new(*period)?)
            }
            TransformSpec::Volatility { window } => Box::new(Volatility::new(*window)?),
            TransformSpec::Distance { source } => Box::new(Distance::new(source.clone())),
            TransformSpec::Rsi { period } => Box::new(Rsi::new(*period)?),
        })
    }
}

/// Label configuration (serializable enum).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelSpec {
    /// Forward-return label over a fixed horizon.
    Horizon {
        horizon: usize,
        threshold: f64,
        #[serde(default)]
        log_returns: bool,
        #[serde(default)]
        ternary: bool,
    },

    /// Fast-over-slow SMA crossover state.
    Crossover { short_window: usize, long_window: usize },
}

impl LabelSpec {
    /// Computes the label column for `series`, rendered to strings for export.
    pub fn apply(&self, series: &Series) -> Result<RenderedLabels, ParameterError> {
        match self {
            LabelSpec::Horizon { horizon, threshold, log_returns, ternary } => {
                let labeler = HorizonLabeler::new(*horizon, *threshold, *log_returns)?;
                if *ternary {
                    Ok(render(&labeler.ternary(series)))
                } else {
                    Ok(render(&labeler.binary(series)))
                }
            }
            LabelSpec::Crossover { short_window, long_window } => {
                let labeler = CrossoverLabeler::new(*short_window, *long_window)?;
                Ok(render(&labeler.label(series)))
            }
        }
    }
}

/// A label column flattened to display form, one entry per input row.
///
/// `None` marks rows the labeler left undefined (the unlabeled tail of a
/// horizon label, the warmup of a crossover label).
#[derive(Debug, Clone)]
pub struct RenderedLabels {
    pub name: String,
    pub values: Vec<Option<String>>,
}

impl RenderedLabels {
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }
}

fn render<L: Copy + Display>(column: &LabelColumn<L>) -> RenderedLabels {
    RenderedLabels {
        name: column.name().to_string(),
        values: column
            .values()
            .iter()
            .map(|value| value.map(|label| label.to_string()))
            .collect(),
    }
}

/// Serializable configuration for a feature run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Transforms to apply, in order. Order matters for column-consuming
    /// transforms such as `DISTANCE`.
    pub features: Vec<TransformSpec>,

    /// Optional label to attach alongside the features.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelSpec>,
}

impl PipelineConfig {
    /// The standard research config: the preset feature set plus a 10-day,
    /// 2% binary horizon label.
    pub fn standard() -> Self {
        Self {
            features: vec![
                TransformSpec::Sma { window: DEFAULT_FAST_SMA },
                TransformSpec::Sma { window: DEFAULT_SLOW_SMA },
                TransformSpec::Ema { span: DEFAULT_EMA_SPAN },
                TransformSpec::Returns,
                TransformSpec::Volatility { window: DEFAULT_VOLATILITY_WINDOW },
                TransformSpec::CumulativeReturn { period: DEFAULT_CUMULATIVE_PERIOD },
                TransformSpec::Rsi { period: DEFAULT_RSI_PERIOD },
                TransformSpec::Distance { source: format!("sma_{DEFAULT_SLOW_SMA}") },
                TransformSpec::Distance { source: format!("ema_{DEFAULT_EMA_SPAN}") },
            ],
            label: Some(LabelSpec::Horizon {
                horizon: DEFAULT_LABEL_HORIZON,
                threshold: DEFAULT_LABEL_THRESHOLD,
                log_returns: false,
                ternary: false,
            }),
        }
    }

    /// Loads a config from a TOML file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| anyhow::anyhow!("failed to parse config {}: {e}", path.display()))?;
        Ok(config)
    }

    /// Renders the config as TOML, suitable for `featurelab preset show`.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builds the transform list this config describes.
    pub fn build_transforms(&self) -> Result<Vec<Box<dyn Transform>>, ParameterError> {
        self.features.iter().map(|spec| spec.build()).collect()
    }

    /// Computes a deterministic content hash for this configuration.
    ///
    /// Two runs with identical configs share a hash, so manifests can be
    /// compared across symbols and machines.
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_string(self).expect("PipelineConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        format!("{}", hash.to_hex())
    }
}
