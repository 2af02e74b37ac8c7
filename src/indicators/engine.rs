//! Batch computation of every indicator for one bar window.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    adx, atr, bollinger_bands, ema, fibonacci_levels, macd, rsi, supertrend, volume_profile, vwap,
    BollingerBands, FibonacciLevel, IndicatorError, IndicatorResult, Macd, Supertrend, VolumeBin,
};
use crate::data::Bar;

/// Lookback periods and widths for the indicator batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Fast EMA period.
    pub ema_fast: usize,
    /// Slow EMA period.
    pub ema_slow: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub bollinger_period: usize,
    /// Band width in standard deviations.
    pub bollinger_width: f64,
    pub atr_period: usize,
    pub supertrend_period: usize,
    pub supertrend_multiplier: f64,
    pub adx_period: usize,
    /// Number of equal-width close-price bins.
    pub volume_profile_bins: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_fast: 9,
            ema_slow: 21,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
            bollinger_period: 20,
            bollinger_width: 2.0,
            atr_period: 14,
            supertrend_period: 10,
            supertrend_multiplier: 3.0,
            adx_period: 14,
            volume_profile_bins: 10,
        }
    }
}

/// Snapshot of every indicator at the last bar of a window.
///
/// Each entry is computed independently; one indicator lacking data does not
/// affect the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub last_close: Option<f64>,
    pub vwap: IndicatorResult<f64>,
    pub ema_fast: IndicatorResult<f64>,
    pub ema_slow: IndicatorResult<f64>,
    pub macd: IndicatorResult<Macd>,
    pub rsi: IndicatorResult<f64>,
    pub bollinger: IndicatorResult<BollingerBands>,
    pub atr: IndicatorResult<f64>,
    pub supertrend: IndicatorResult<Supertrend>,
    pub adx: IndicatorResult<f64>,
    pub fibonacci: IndicatorResult<Vec<FibonacciLevel>>,
    pub volume_profile: IndicatorResult<Vec<VolumeBin>>,
}

impl IndicatorSet {
    /// Compute all indicators over `bars` (ascending order).
    pub fn compute(bars: &[Bar], config: &IndicatorConfig) -> Self {
        let set = Self {
            last_close: bars.last().map(|b| b.close),
            vwap: vwap(bars),
            ema_fast: ema(bars, config.ema_fast),
            ema_slow: ema(bars, config.ema_slow),
            macd: macd(bars, config.macd_fast, config.macd_slow, config.macd_signal),
            rsi: rsi(bars, config.rsi_period),
            bollinger: bollinger_bands(bars, config.bollinger_period, config.bollinger_width),
            atr: atr(bars, config.atr_period),
            supertrend: supertrend(bars, config.supertrend_period, config.supertrend_multiplier),
            adx: adx(bars, config.adx_period),
            fibonacci: fibonacci_levels(bars),
            volume_profile: volume_profile(bars, config.volume_profile_bins),
        };

        for err in set.errors() {
            warn!("{}", err);
        }
        debug!(
            "Computed indicators over {} bars ({} unavailable)",
            bars.len(),
            set.errors().len()
        );

        set
    }

    /// Errors from every indicator that could not be computed.
    pub fn errors(&self) -> Vec<&IndicatorError> {
        [
            self.vwap.as_ref().err(),
            self.ema_fast.as_ref().err(),
            self.ema_slow.as_ref().err(),
            self.macd.as_ref().err(),
            self.rsi.as_ref().err(),
            self.bollinger.as_ref().err(),
            self.atr.as_ref().err(),
            self.supertrend.as_ref().err(),
            self.adx.as_ref().err(),
            self.fibonacci.as_ref().err(),
            self.volume_profile.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.errors().is_empty()
    }
}
