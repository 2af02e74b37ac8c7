//! Technical indicators over an ascending bar window.
//!
//! Every indicator is a pure function returning [`IndicatorResult`]. A window
//! shorter than the indicator needs is reported as
//! [`IndicatorError::InsufficientData`] for that indicator alone; values are
//! never defaulted to zero.
//!
//! - Moving averages: EMA, MACD
//! - Momentum: RSI, ADX
//! - Volatility: ATR, Bollinger Bands, Supertrend
//! - Volume: VWAP, volume profile
//! - Levels: Fibonacci retracements

pub mod engine;
pub mod levels;
pub mod momentum;
pub mod moving_average;
pub mod volatility;
pub mod volume;

use serde::Serialize;
use thiserror::Error;

pub use engine::{IndicatorConfig, IndicatorSet};
pub use levels::{fibonacci_levels, FibonacciLevel, FIBONACCI_RATIOS};
pub use momentum::{adx, rsi};
pub use moving_average::{ema, ema_series, macd, Macd};
pub use volatility::{atr, bollinger_bands, supertrend, BollingerBands, Supertrend, Trend};
pub use volume::{volume_profile, vwap, VolumeBin};

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum IndicatorError {
    #[error("{indicator}: insufficient data (need {required} bars, have {available})")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("{indicator}: no traded volume in window")]
    ZeroVolume { indicator: &'static str },

    #[error("{indicator}: invalid parameter: {reason}")]
    InvalidParameter {
        indicator: &'static str,
        reason: String,
    },
}

pub type IndicatorResult<T> = Result<T, IndicatorError>;

pub(crate) fn require(indicator: &'static str, required: usize, available: usize) -> IndicatorResult<()> {
    if available < required {
        return Err(IndicatorError::InsufficientData {
            indicator,
            required,
            available,
        });
    }
    Ok(())
}

pub(crate) fn require_period(indicator: &'static str, period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter {
            indicator,
            reason: "period must be positive".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1). Zero for fewer than two values.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
