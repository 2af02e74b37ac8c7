//! Priced options chain around spot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::black_scholes::{OptionPricer, PricingError};
use super::strikes::{StrikeLadderBuilder, DEFAULT_STRIKE_OFFSETS_PCT};
use super::volatility::{VolatilityEstimator, DEFAULT_VOLATILITY, TRADING_DAYS_PER_YEAR};
use crate::data::{decimal_from_f64, Bar, Moneyness, OptionQuote, OptionType, OptionsChain, StrikeRow};

/// Chain construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Annual risk-free rate.
    pub risk_free_rate: f64,
    /// Calendar days to expiry.
    pub expiry_days: u32,
    /// Strike rounding increment.
    pub strike_tick: f64,
    /// Percentage offsets from spot for the strike ladder.
    pub strike_offsets_pct: Vec<f64>,
    /// Volatility used when the bar window is too short to estimate one.
    pub default_volatility: f64,
    pub trading_days_per_year: f64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.06,
            expiry_days: 30,
            strike_tick: 50.0,
            strike_offsets_pct: DEFAULT_STRIKE_OFFSETS_PCT.to_vec(),
            default_volatility: DEFAULT_VOLATILITY,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl ChainConfig {
    pub fn tick(&self) -> Decimal {
        decimal_from_f64(self.strike_tick)
    }

    /// Years to expiry on a 365-day calendar.
    pub fn time_to_expiry(&self) -> f64 {
        self.expiry_days as f64 / 365.0
    }
}

/// Builds a priced call/put chain from spot and the bar history.
#[derive(Debug, Clone)]
pub struct OptionsChainBuilder {
    config: ChainConfig,
    pricer: OptionPricer,
    ladder: StrikeLadderBuilder,
    estimator: VolatilityEstimator,
}

impl OptionsChainBuilder {
    pub fn new(config: ChainConfig) -> Self {
        let offsets: Vec<Decimal> = config
            .strike_offsets_pct
            .iter()
            .map(|&p| decimal_from_f64(p))
            .collect();

        Self {
            pricer: OptionPricer::new(config.risk_free_rate),
            ladder: StrikeLadderBuilder::new(config.tick(), &offsets),
            estimator: VolatilityEstimator::new(
                config.trading_days_per_year,
                config.default_volatility,
            ),
            config,
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Estimate volatility from `bars` and price the chain at `spot`.
    pub fn build(&self, spot: f64, bars: &[Bar]) -> Result<OptionsChain, PricingError> {
        let vol = self.estimator.realized(bars);
        self.build_with_volatility(spot, vol)
    }

    /// Price the chain at `spot` with a given volatility.
    pub fn build_with_volatility(&self, spot: f64, vol: f64) -> Result<OptionsChain, PricingError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidParameter {
                name: "spot",
                value: spot,
            });
        }

        let spot_dec = decimal_from_f64(spot);
        let time = self.config.time_to_expiry();
        let strikes = self.ladder.build(spot_dec);

        let mut rows = Vec::with_capacity(strikes.len());
        for strike in strikes {
            let strike_f: f64 = strike.try_into().unwrap_or(0.0);
            rows.push(StrikeRow {
                strike,
                call: self.quote(spot, spot_dec, strike, strike_f, time, vol, OptionType::Call)?,
                put: self.quote(spot, spot_dec, strike, strike_f, time, vol, OptionType::Put)?,
            });
        }

        debug!(
            "Built chain: spot={:.2}, vol={:.4}, {} strikes, {} days",
            spot,
            vol,
            rows.len(),
            self.config.expiry_days
        );

        Ok(OptionsChain {
            spot: spot_dec,
            implied_volatility: vol,
            expiry_days: self.config.expiry_days,
            risk_free_rate: self.config.risk_free_rate,
            rows,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn quote(
        &self,
        spot: f64,
        spot_dec: Decimal,
        strike: Decimal,
        strike_f: f64,
        time: f64,
        vol: f64,
        option_type: OptionType,
    ) -> Result<OptionQuote, PricingError> {
        let q = self.pricer.quote(spot, strike_f, time, vol, option_type)?;
        Ok(OptionQuote {
            strike,
            option_type,
            premium: decimal_from_f64(q.price).round_dp(2).max(Decimal::ZERO),
            greeks: q.greeks,
            moneyness: Moneyness::of(option_type, strike, spot_dec),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{bars_from_closes, flat_bars};
    use rust_decimal_macros::dec;

    fn small_tick_config() -> ChainConfig {
        ChainConfig {
            strike_tick: 5.0,
            ..ChainConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = ChainConfig::default();
        assert_eq!(config.risk_free_rate, 0.06);
        assert_eq!(config.expiry_days, 30);
        assert_eq!(config.tick(), dec!(50));
        assert_eq!(config.default_volatility, 0.25);
    }

    #[test]
    fn test_chain_strictly_increasing_with_complementary_moneyness() {
        let builder = OptionsChainBuilder::new(small_tick_config());
        let chain = builder.build_with_volatility(100.0, 0.2).unwrap();

        assert_eq!(chain.len(), 7);
        assert!(chain.rows.windows(2).all(|w| w[0].strike < w[1].strike));

        for row in &chain.rows {
            assert!(row.call.premium >= Decimal::ZERO);
            assert!(row.put.premium >= Decimal::ZERO);
            match row.strike.cmp(&chain.spot) {
                std::cmp::Ordering::Less => {
                    assert_eq!(row.call.moneyness, Moneyness::Itm);
                    assert_eq!(row.put.moneyness, Moneyness::Otm);
                }
                std::cmp::Ordering::Greater => {
                    assert_eq!(row.call.moneyness, Moneyness::Otm);
                    assert_eq!(row.put.moneyness, Moneyness::Itm);
                }
                std::cmp::Ordering::Equal => {
                    assert_eq!(row.call.moneyness, Moneyness::Atm);
                    assert_eq!(row.put.moneyness, Moneyness::Atm);
                }
            }
        }
    }

    #[test]
    fn test_call_premiums_fall_with_strike() {
        let builder = OptionsChainBuilder::new(small_tick_config());
        let chain = builder.build_with_volatility(100.0, 0.2).unwrap();
        let calls: Vec<Decimal> = chain.calls().map(|q| q.premium).collect();
        assert!(calls.windows(2).all(|w| w[0] >= w[1]));
        let puts: Vec<Decimal> = chain.puts().map(|q| q.premium).collect();
        assert!(puts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_volatility_from_bars() {
        let builder = OptionsChainBuilder::new(small_tick_config());
        let short = builder.build(100.0, &flat_bars(1, 100.0)).unwrap();
        assert_eq!(short.implied_volatility, DEFAULT_VOLATILITY);

        let closes: Vec<f64> = (0..30).map(|i| 100.0 + if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let chain = builder.build(100.0, &bars_from_closes(&closes)).unwrap();
        assert!(chain.implied_volatility > 0.0);
        assert_ne!(chain.implied_volatility, DEFAULT_VOLATILITY);
    }

    #[test]
    fn test_flat_history_prices_intrinsic() {
        let builder = OptionsChainBuilder::new(small_tick_config());
        let chain = builder.build(100.0, &flat_bars(30, 100.0)).unwrap();
        let atm = chain.call_at_strike(dec!(100)).unwrap();
        assert_eq!(atm.premium, Decimal::ZERO);
        let itm = chain.call_at_strike(dec!(90)).unwrap();
        assert_eq!(itm.premium, dec!(10));
    }

    #[test]
    fn test_invalid_spot() {
        let builder = OptionsChainBuilder::new(ChainConfig::default());
        assert!(builder.build_with_volatility(0.0, 0.2).is_err());
        assert!(builder.build_with_volatility(f64::NAN, 0.2).is_err());
    }
}
