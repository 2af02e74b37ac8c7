//! Momentum and trend-strength oscillators: RSI and ADX.

use super::volatility::true_ranges;
use super::{mean, require, require_period, IndicatorResult};
use crate::data::Bar;

/// Relative Strength Index over the last `period` close-to-close changes.
///
/// Gains and losses are averaged with a simple rolling mean. With no losses
/// the index is 100; with losses and no gains it is 0.
pub fn rsi(bars: &[Bar], period: usize) -> IndicatorResult<f64> {
    require_period("rsi", period)?;
    require("rsi", period + 1, bars.len())?;

    let window = &bars[bars.len() - period - 1..];
    let (gains, losses): (Vec<f64>, Vec<f64>) = window
        .windows(2)
        .map(|w| {
            let delta = w[1].close - w[0].close;
            (delta.max(0.0), (-delta).max(0.0))
        })
        .unzip();

    let avg_gain = mean(&gains);
    let avg_loss = mean(&losses);

    if avg_loss == 0.0 {
        return Ok(100.0);
    }
    if avg_gain == 0.0 {
        return Ok(0.0);
    }

    let rs = avg_gain / avg_loss;
    Ok(100.0 - 100.0 / (1.0 + rs))
}

/// Average Directional Index.
///
/// +DM/-DM come from consecutive high/low deltas; a move only counts when it
/// is positive and larger than the opposing move. At every bar with a full
/// window, `DI = 100 · mean(DM) / ATR` over the same `period` bars and
/// `DX = 100 · |+DI - -DI| / (+DI + -DI)`. ADX is the mean of the last
/// `period` DX values, so `2 · period` bars are required.
pub fn adx(bars: &[Bar], period: usize) -> IndicatorResult<f64> {
    require_period("adx", period)?;
    require("adx", 2 * period, bars.len())?;

    let mut plus_dm = Vec::with_capacity(bars.len() - 1);
    let mut minus_dm = Vec::with_capacity(bars.len() - 1);
    for w in bars.windows(2) {
        let up = w[1].high - w[0].high;
        let down = w[0].low - w[1].low;
        plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });
    }
    let tr = true_ranges(bars);

    // Index `end` is exclusive into the movement arrays (length n - 1).
    let dx: Vec<f64> = (period..=tr.len())
        .map(|end| {
            let start = end - period;
            let atr = mean(&tr[start..end]);
            let (plus_di, minus_di) = if atr == 0.0 {
                (0.0, 0.0)
            } else {
                (
                    100.0 * mean(&plus_dm[start..end]) / atr,
                    100.0 * mean(&minus_dm[start..end]) / atr,
                )
            };
            let di_sum = plus_di + minus_di;
            if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di - minus_di).abs() / di_sum
            }
        })
        .collect();

    Ok(mean(&dx[dx.len() - period..]))
}
