//! The standard research feature set.
//!
//! One parameterized list instead of per-study copies: SMA 10/50, EMA 20,
//! simple and log returns, 20-day return volatility, distance to the slow
//! SMA and the EMA, 5-day compounded return, RSI 14. Warmup is dominated
//! by the slow SMA (49 rows).

use crate::error::{ParameterError, PipelineError};
use crate::pipeline::builder::FeaturePipeline;
use crate::transforms::{
    CumulativeReturn, Distance, Ema, Returns, Rsi, Sma, Transform, Volatility,
};

pub const DEFAULT_FAST_SMA: usize = 10;
pub const DEFAULT_SLOW_SMA: usize = 50;
pub const DEFAULT_EMA_SPAN: usize = 20;
pub const DEFAULT_VOLATILITY_WINDOW: usize = 20;
pub const DEFAULT_CUMULATIVE_PERIOD: usize = 5;
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// The standard transforms, in dependency order.
pub fn standard_features() -> Result<Vec<Box<dyn Transform>>, ParameterError> {
    Ok(vec![
        Box::new(Sma::new(DEFAULT_FAST_SMA)?),
        Box::new(Sma::new(DEFAULT_SLOW_SMA)?),
        Box::new(Ema::new(DEFAULT_EMA_SPAN)?),
        Box::new(Returns::new()),
        Box::new(Volatility::new(DEFAULT_VOLATILITY_WINDOW)?),
        Box::new(CumulativeReturn::new(DEFAULT_CUMULATIVE_PERIOD)?),
        Box::new(Rsi::new(DEFAULT_RSI_PERIOD)?),
        Box::new(Distance::new(format!("sma_{DEFAULT_SLOW_SMA}"))),
        Box::new(Distance::new(format!("ema_{DEFAULT_EMA_SPAN}"))),
    ])
}

/// The standard feature set as a validated, ready-to-run pipeline.
pub fn standard_pipeline() -> Result<FeaturePipeline, PipelineError> {
    Ok(FeaturePipeline::new(standard_features()?)?)
}
