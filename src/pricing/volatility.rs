//! Realized volatility from close-to-close returns.

use tracing::debug;

use crate::data::Bar;

/// Fallback when fewer than two returns are available.
pub const DEFAULT_VOLATILITY: f64 = 0.25;

/// Annualization factor.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized sample standard deviation of simple returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityEstimator {
    pub trading_days: f64,
    pub fallback: f64,
}

impl Default for VolatilityEstimator {
    fn default() -> Self {
        Self {
            trading_days: TRADING_DAYS_PER_YEAR,
            fallback: DEFAULT_VOLATILITY,
        }
    }
}

impl VolatilityEstimator {
    pub fn new(trading_days: f64, fallback: f64) -> Self {
        Self {
            trading_days,
            fallback,
        }
    }

    /// Simple returns `c[i] / c[i-1] - 1`. Returns from a non-positive prior
    /// close are skipped.
    pub fn returns(bars: &[Bar]) -> Vec<f64> {
        bars.windows(2)
            .filter(|w| w[0].close > 0.0)
            .map(|w| w[1].close / w[0].close - 1.0)
            .filter(|r| r.is_finite())
            .collect()
    }

    /// Annualized realized volatility, or the fallback for short windows.
    pub fn realized(&self, bars: &[Bar]) -> f64 {
        let returns = Self::returns(bars);
        if returns.len() < 2 {
            debug!(
                "Only {} returns available, using fallback volatility {}",
                returns.len(),
                self.fallback
            );
            return self.fallback;
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);

        var.sqrt() * self.trading_days.sqrt()
    }
}
