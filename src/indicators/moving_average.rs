//! Exponential moving averages and MACD.

use serde::Serialize;

use super::{require, require_period, IndicatorError, IndicatorResult};
use crate::data::Bar;

/// Exponential moving average series.
///
/// Multiplier `k = 2 / (period + 1)`, seeded with the SMA of the first
/// `period` values. The returned series is aligned to the end of the input:
/// `result.last()` corresponds to `values.last()`. Empty if there are fewer
/// than `period` values.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        prev += k * (value - prev);
        out.push(prev);
    }

    out
}

/// EMA of closes, last value.
pub fn ema(bars: &[Bar], period: usize) -> IndicatorResult<f64> {
    require_period("ema", period)?;
    require("ema", period, bars.len())?;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    ema_series(&closes, period)
        .last()
        .copied()
        .ok_or(IndicatorError::InsufficientData {
            indicator: "ema",
            required: period,
            available: bars.len(),
        })
}

/// Latest MACD reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Macd {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD line, signal line and histogram at the last bar.
///
/// Needs `slow` bars. The signal EMA is seeded with the mean of the first
/// `signal` MACD values, or of every MACD value while fewer exist.
pub fn macd(bars: &[Bar], fast: usize, slow: usize, signal: usize) -> IndicatorResult<Macd> {
    require_period("macd", fast)?;
    require_period("macd", slow)?;
    require_period("macd", signal)?;
    if fast >= slow {
        return Err(IndicatorError::InvalidParameter {
            indicator: "macd",
            reason: format!("fast period {fast} must be below slow period {slow}"),
        });
    }
    require("macd", slow, bars.len())?;

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let fast_ema = ema_series(&closes, fast);
    let slow_ema = ema_series(&closes, slow);

    // Both series end at the last close; drop the fast series' extra head.
    let offset = fast_ema.len() - slow_ema.len();
    let macd_line: Vec<f64> = fast_ema[offset..]
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();

    let Some(&last) = macd_line.last() else {
        return Err(IndicatorError::InsufficientData {
            indicator: "macd",
            required: slow,
            available: bars.len(),
        });
    };

    let seed_len = signal.min(macd_line.len());
    let k = 2.0 / (signal as f64 + 1.0);
    let mut signal_value = macd_line[..seed_len].iter().sum::<f64>() / seed_len as f64;
    for &value in &macd_line[seed_len..] {
        signal_value += k * (value - signal_value);
    }

    Ok(Macd {
        macd: last,
        signal: signal_value,
        histogram: last - signal_value,
    })
}
