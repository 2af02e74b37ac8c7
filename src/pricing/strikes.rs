//! Strike ladder around spot.

use rust_decimal::{Decimal, RoundingStrategy};

/// Default percentage offsets from spot.
pub const DEFAULT_STRIKE_OFFSETS_PCT: [f64; 11] =
    [-10.0, -7.5, -5.0, -2.5, 0.0, 2.5, 5.0, 7.5, 10.0, 15.0, 20.0];

/// Builds a sorted, deduplicated list of tick-aligned strikes.
#[derive(Debug, Clone, PartialEq)]
pub struct StrikeLadderBuilder {
    tick: Decimal,
    offsets_pct: Vec<Decimal>,
}

impl StrikeLadderBuilder {
    /// `tick` must be positive; offsets are percentages of spot.
    pub fn new(tick: Decimal, offsets_pct: &[Decimal]) -> Self {
        Self {
            tick,
            offsets_pct: offsets_pct.to_vec(),
        }
    }

    pub fn tick(&self) -> Decimal {
        self.tick
    }

    /// Strikes at each offset, rounded to the nearest tick (midpoints away
    /// from zero), non-positive values dropped, sorted and unique.
    pub fn build(&self, spot: Decimal) -> Vec<Decimal> {
        if self.tick <= Decimal::ZERO || spot <= Decimal::ZERO {
            return Vec::new();
        }

        let hundred = Decimal::ONE_HUNDRED;
        let mut strikes: Vec<Decimal> = self
            .offsets_pct
            .iter()
            .map(|pct| {
                let target = spot * (Decimal::ONE + *pct / hundred);
                (target / self.tick).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    * self.tick
            })
            .filter(|k| *k > Decimal::ZERO)
            .map(|k| k.normalize())
            .collect();

        strikes.sort();
        strikes.dedup();
        strikes
    }
}
