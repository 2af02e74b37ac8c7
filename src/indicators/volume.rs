//! Volume-weighted indicators.

use serde::Serialize;

use super::{require, IndicatorError, IndicatorResult};
use crate::data::Bar;

/// Cumulative volume-weighted average price over the whole window.
pub fn vwap(bars: &[Bar]) -> IndicatorResult<f64> {
    require("vwap", 1, bars.len())?;

    let (pv, volume) = bars.iter().fold((0.0, 0.0), |(pv, vol), b| {
        (pv + b.typical_price() * b.volume, vol + b.volume)
    });

    if volume <= 0.0 {
        return Err(IndicatorError::ZeroVolume { indicator: "vwap" });
    }

    Ok(pv / volume)
}

/// Traded volume within one close-price bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeBin {
    pub lower: f64,
    pub upper: f64,
    pub volume: f64,
}

impl VolumeBin {
    /// Range label, e.g. `"99.50-101.25"`.
    pub fn label(&self) -> String {
        format!("{:.2}-{:.2}", self.lower, self.upper)
    }
}

/// Split the close range into `bins` equal-width bins and sum volume per bin.
///
/// Every bin is reported, including empty ones. The top bin is closed on the
/// right so the maximum close is counted. When all closes are equal the range
/// is widened by 0.1% on each side.
pub fn volume_profile(bars: &[Bar], bins: usize) -> IndicatorResult<Vec<VolumeBin>> {
    if bins == 0 {
        return Err(IndicatorError::InvalidParameter {
            indicator: "volume_profile",
            reason: "bin count must be positive".to_string(),
        });
    }
    require("volume_profile", 1, bars.len())?;

    let (mut lo, mut hi) = bars.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
        (lo.min(b.close), hi.max(b.close))
    });

    if lo == hi {
        let pad = if lo == 0.0 { 0.001 } else { 0.001 * lo.abs() };
        lo -= pad;
        hi += pad;
    }

    let width = (hi - lo) / bins as f64;
    let mut profile: Vec<VolumeBin> = (0..bins)
        .map(|i| VolumeBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            volume: 0.0,
        })
        .collect();

    for bar in bars {
        let idx = (((bar.close - lo) / width).floor() as usize).min(bins - 1);
        profile[idx].volume += bar.volume;
    }

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{bars_from_closes, flat_bars, start};
    use approx::assert_relative_eq;

    #[test]
    fn test_vwap_flat() {
        assert_eq!(vwap(&flat_bars(30, 100.0)).unwrap(), 100.0);
    }

    #[test]
    fn test_vwap_weights_by_volume() {
        let t = start();
        let bars = vec![
            Bar::new(t, 10.0, 10.0, 10.0, 10.0, 100.0),
            Bar::new(t, 20.0, 20.0, 20.0, 20.0, 300.0),
        ];
        assert_relative_eq!(vwap(&bars).unwrap(), 17.5);
    }

    #[test]
    fn test_vwap_zero_volume() {
        let t = start();
        let bars = vec![Bar::new(t, 10.0, 10.0, 10.0, 10.0, 0.0)];
        assert_eq!(
            vwap(&bars),
            Err(IndicatorError::ZeroVolume { indicator: "vwap" })
        );
    }

    #[test]
    fn test_volume_profile_sums_all_volume() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i % 17) as f64).collect();
        let profile = volume_profile(&bars_from_closes(&closes), 10).unwrap();
        assert_eq!(profile.len(), 10);
        let total: f64 = profile.iter().map(|b| b.volume).sum();
        assert_relative_eq!(total, 50.0 * 1000.0);
        assert_relative_eq!(profile[0].lower, 100.0);
        assert_relative_eq!(profile[9].upper, 116.0);
    }

    #[test]
    fn test_volume_profile_flat_window() {
        let profile = volume_profile(&flat_bars(10, 100.0), 10).unwrap();
        assert_eq!(profile.len(), 10);
        assert!(profile[0].lower < 100.0 && profile[9].upper > 100.0);
        let total: f64 = profile.iter().map(|b| b.volume).sum();
        assert_relative_eq!(total, 10_000.0);
    }

    #[test]
    fn test_volume_bin_label() {
        let bin = VolumeBin {
            lower: 99.5,
            upper: 101.254,
            volume: 1.0,
        };
        assert_eq!(bin.label(), "99.50-101.25");
    }
}
