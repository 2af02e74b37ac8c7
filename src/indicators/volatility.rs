//! Range and dispersion indicators: ATR, Bollinger Bands, Supertrend.

use serde::{Deserialize, Serialize};

use super::{mean, require, require_period, sample_std, IndicatorError, IndicatorResult};
use crate::data::Bar;

/// True range for every bar after the first.
///
/// `tr[i-1] = max(H - L, |H - prevC|, |L - prevC|)` for bar `i`.
pub(crate) fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| {
            let (prev, cur) = (&w[0], &w[1]);
            (cur.high - cur.low)
                .max((cur.high - prev.close).abs())
                .max((cur.low - prev.close).abs())
        })
        .collect()
}

/// Average true range: simple mean of the last `period` true ranges.
pub fn atr(bars: &[Bar], period: usize) -> IndicatorResult<f64> {
    require_period("atr", period)?;
    require("atr", period + 1, bars.len())?;

    let tr = true_ranges(bars);
    Ok(mean(&tr[tr.len() - period..]))
}

/// Bollinger Bands at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// SMA(period) ± width · sample standard deviation.
pub fn bollinger_bands(bars: &[Bar], period: usize, width: f64) -> IndicatorResult<BollingerBands> {
    if period < 2 {
        return Err(IndicatorError::InvalidParameter {
            indicator: "bollinger",
            reason: "period must be at least 2".to_string(),
        });
    }
    if !width.is_finite() || width < 0.0 {
        return Err(IndicatorError::InvalidParameter {
            indicator: "bollinger",
            reason: format!("band width {width} must be non-negative"),
        });
    }
    require("bollinger", period, bars.len())?;

    let window: Vec<f64> = bars[bars.len() - period..].iter().map(|b| b.close).collect();
    let middle = mean(&window);
    let offset = width * sample_std(&window);

    Ok(BollingerBands {
        upper: middle + offset,
        middle,
        lower: middle - offset,
    })
}

/// Supertrend direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
}

/// Supertrend reading at the last bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Supertrend {
    pub value: f64,
    pub trend: Trend,
}

/// Supertrend from the last bar only.
///
/// Basic bands are `HL2 ± multiplier · ATR`. A close above the upper band is
/// bullish and reports the lower band; anything else is bearish and reports
/// the upper band. Flip state is not carried across bars.
pub fn supertrend(bars: &[Bar], period: usize, multiplier: f64) -> IndicatorResult<Supertrend> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(IndicatorError::InvalidParameter {
            indicator: "supertrend",
            reason: format!("multiplier {multiplier} must be non-negative"),
        });
    }
    let atr_value = atr(bars, period).map_err(|e| match e {
        IndicatorError::InsufficientData {
            required,
            available,
            ..
        } => IndicatorError::InsufficientData {
            indicator: "supertrend",
            required,
            available,
        },
        other => other,
    })?;

    let Some(last) = bars.last() else {
        return Err(IndicatorError::InsufficientData {
            indicator: "supertrend",
            required: period + 1,
            available: 0,
        });
    };

    let hl2 = last.hl2();
    let upper = hl2 + multiplier * atr_value;
    let lower = hl2 - multiplier * atr_value;

    if last.close > upper {
        Ok(Supertrend {
            value: lower,
            trend: Trend::Bullish,
        })
    } else {
        Ok(Supertrend {
            value: upper,
            trend: Trend::Bearish,
        })
    }
}
