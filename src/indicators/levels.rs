//! Fibonacci retracement levels.

use serde::Serialize;

use super::{require, IndicatorResult};
use crate::data::Bar;

/// Retracement fractions measured down from the window high.
pub const FIBONACCI_RATIOS: [f64; 6] = [0.0, 0.236, 0.382, 0.5, 0.618, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
}

impl FibonacciLevel {
    /// Percentage label, e.g. `"61.8%"`.
    pub fn label(&self) -> String {
        let pct = self.ratio * 100.0;
        if pct.fract() == 0.0 {
            format!("{pct:.0}%")
        } else {
            format!("{pct:.1}%")
        }
    }
}

/// `high - ratio · (high - low)` for every ratio in [`FIBONACCI_RATIOS`].
pub fn fibonacci_levels(bars: &[Bar]) -> IndicatorResult<Vec<FibonacciLevel>> {
    require("fibonacci", 1, bars.len())?;

    let high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let range = high - low;

    Ok(FIBONACCI_RATIOS
        .iter()
        .map(|&ratio| FibonacciLevel {
            ratio,
            price: high - ratio * range,
        })
        .collect())
}
