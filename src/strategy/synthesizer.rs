//! Strategy synthesis from a priced chain and a market outlook.
//!
//! Selection rules scan the chain in ascending strike order:
//! - Bullish: Long Call at the first ATM strike; Bull Call Spread buying the
//!   first strike below spot and selling the first strike above spot, both
//!   with a positive call premium
//! - Bearish: Long Put at the first ATM strike
//! - Neutral: Short Straddle at the strike nearest spot, if within half a tick
//!
//! A strategy whose strikes cannot be found is left out.

use rust_decimal::Decimal;
use tracing::debug;

use super::types::{BullCallSpread, LongCall, LongPut, ShortStraddle, Strategy, StrategyLeg};
use crate::data::{Moneyness, OptionType, OptionsChain, StrikeRow};
use crate::signals::Outlook;

/// Strategy synthesizer.
#[derive(Debug, Clone)]
pub struct StrategySynthesizer {
    strike_tick: Decimal,
}

impl StrategySynthesizer {
    pub fn new(strike_tick: Decimal) -> Self {
        Self { strike_tick }
    }

    /// Build every strategy the outlook calls for.
    pub fn synthesize(&self, chain: &OptionsChain, outlook: Outlook) -> Vec<Strategy> {
        let candidates = match outlook {
            Outlook::Bullish => vec![self.long_call(chain), self.bull_call_spread(chain)],
            Outlook::Bearish => vec![self.long_put(chain)],
            Outlook::Neutral => vec![self.short_straddle(chain)],
        };

        let strategies: Vec<Strategy> = candidates.into_iter().flatten().collect();
        debug!(
            "{} outlook: {} strategies from {} strikes",
            outlook,
            strategies.len(),
            chain.len()
        );
        strategies
    }

    /// Buy the first ATM call.
    pub fn long_call(&self, chain: &OptionsChain) -> Option<Strategy> {
        let Some(call) = chain.calls().find(|q| q.moneyness == Moneyness::Atm) else {
            debug!("Long Call omitted: no ATM strike");
            return None;
        };

        Some(Strategy::LongCall(LongCall {
            leg: StrategyLeg::buy(OptionType::Call, call.strike, call.premium),
            max_loss: call.premium,
            breakeven: call.strike + call.premium,
        }))
    }

    /// Buy the first call below spot, sell the first call above spot.
    pub fn bull_call_spread(&self, chain: &OptionsChain) -> Option<Strategy> {
        let long = chain
            .calls()
            .find(|q| q.strike < chain.spot && q.premium > Decimal::ZERO);
        let short = chain
            .calls()
            .find(|q| q.strike > chain.spot && q.premium > Decimal::ZERO);

        let (Some(long), Some(short)) = (long, short) else {
            debug!("Bull Call Spread omitted: no priced strikes on both sides of spot");
            return None;
        };

        let net_premium = long.premium - short.premium;
        let width = short.strike - long.strike;

        Some(Strategy::BullCallSpread(BullCallSpread {
            long: StrategyLeg::buy(OptionType::Call, long.strike, long.premium),
            short: StrategyLeg::sell(OptionType::Call, short.strike, short.premium),
            net_premium,
            max_profit: width - net_premium,
            max_loss: net_premium,
            breakeven: long.strike + net_premium,
        }))
    }

    /// Buy the first ATM put.
    pub fn long_put(&self, chain: &OptionsChain) -> Option<Strategy> {
        let Some(put) = chain.puts().find(|q| q.moneyness == Moneyness::Atm) else {
            debug!("Long Put omitted: no ATM strike");
            return None;
        };

        Some(Strategy::LongPut(LongPut {
            leg: StrategyLeg::buy(OptionType::Put, put.strike, put.premium),
            max_profit: put.strike - put.premium,
            max_loss: put.premium,
            breakeven: put.strike - put.premium,
        }))
    }

    /// Sell call and put at the strike nearest spot, within half a tick.
    pub fn short_straddle(&self, chain: &OptionsChain) -> Option<Strategy> {
        let Some(row) = self.nearest_row(chain) else {
            debug!("Short Straddle omitted: no strike within half a tick of spot");
            return None;
        };

        let total_premium = row.call.premium + row.put.premium;

        Some(Strategy::ShortStraddle(ShortStraddle {
            call: StrategyLeg::sell(OptionType::Call, row.strike, row.call.premium),
            put: StrategyLeg::sell(OptionType::Put, row.strike, row.put.premium),
            total_premium,
            max_profit: total_premium,
            lower_breakeven: row.strike - total_premium,
            upper_breakeven: row.strike + total_premium,
        }))
    }

    /// Row nearest spot; the lower strike wins an exact tie.
    fn nearest_row<'a>(&self, chain: &'a OptionsChain) -> Option<&'a StrikeRow> {
        let half_tick = self.strike_tick / Decimal::TWO;
        chain
            .rows
            .iter()
            .map(|row| ((row.strike - chain.spot).abs(), row))
            .filter(|(distance, _)| *distance <= half_tick)
            .min_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, row)| row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Greeks, OptionQuote};
    use crate::pricing::{ChainConfig, OptionsChainBuilder};
    use crate::strategy::types::Payoff;
    use rust_decimal_macros::dec;

    fn chain_at(spot: f64, tick: f64) -> OptionsChain {
        OptionsChainBuilder::new(ChainConfig {
            strike_tick: tick,
            ..ChainConfig::default()
        })
        .build_with_volatility(spot, 0.2)
        .unwrap()
    }

    fn quote(strike: Decimal, spot: Decimal, option_type: OptionType, premium: Decimal) -> OptionQuote {
        OptionQuote {
            strike,
            option_type,
            premium,
            greeks: Greeks::default(),
            moneyness: Moneyness::of(option_type, strike, spot),
        }
    }

    fn manual_chain(spot: Decimal, rows: &[(Decimal, Decimal, Decimal)]) -> OptionsChain {
        OptionsChain {
            spot,
            implied_volatility: 0.2,
            expiry_days: 30,
            risk_free_rate: 0.06,
            rows: rows
                .iter()
                .map(|&(strike, call, put)| StrikeRow {
                    strike,
                    call: quote(strike, spot, OptionType::Call, call),
                    put: quote(strike, spot, OptionType::Put, put),
                })
                .collect(),
        }
    }

    #[test]
    fn test_bullish_with_exact_atm() {
        let chain = chain_at(100.0, 5.0);
        let synth = StrategySynthesizer::new(dec!(5));
        let strategies = synth.synthesize(&chain, Outlook::Bullish);
        assert_eq!(strategies.len(), 2);

        let Strategy::LongCall(lc) = &strategies[0] else {
            panic!("expected Long Call first");
        };
        assert_eq!(lc.leg.strike, dec!(100));
        assert_eq!(lc.breakeven, dec!(100) + lc.leg.premium);
        assert_eq!(lc.max_loss, lc.leg.premium);

        let Strategy::BullCallSpread(bcs) = &strategies[1] else {
            panic!("expected Bull Call Spread second");
        };
        assert_eq!(bcs.long.strike, dec!(90));
        assert_eq!(bcs.short.strike, dec!(105));
        assert_eq!(bcs.max_loss, bcs.net_premium);
        assert_eq!(bcs.net_premium, bcs.long.premium - bcs.short.premium);
        assert_eq!(bcs.max_profit, dec!(15) - bcs.net_premium);
        assert_eq!(bcs.breakeven, dec!(90) + bcs.net_premium);
    }

    #[test]
    fn test_bearish_long_put() {
        let chain = chain_at(100.0, 5.0);
        let strategies = StrategySynthesizer::new(dec!(5)).synthesize(&chain, Outlook::Bearish);
        assert_eq!(strategies.len(), 1);

        let Strategy::LongPut(lp) = &strategies[0] else {
            panic!("expected Long Put");
        };
        assert_eq!(lp.leg.strike, dec!(100));
        assert_eq!(lp.max_profit, dec!(100) - lp.leg.premium);
        assert_eq!(lp.breakeven, dec!(100) - lp.leg.premium);
    }

    #[test]
    fn test_neutral_straddle_at_spot() {
        let chain = chain_at(100.0, 5.0);
        let strategies = StrategySynthesizer::new(dec!(5)).synthesize(&chain, Outlook::Neutral);
        assert_eq!(strategies.len(), 1);

        let Strategy::ShortStraddle(ss) = &strategies[0] else {
            panic!("expected Short Straddle");
        };
        assert_eq!(ss.call.strike, dec!(100));
        assert_eq!(ss.total_premium, ss.call.premium + ss.put.premium);
        assert_eq!(ss.upper_breakeven, dec!(100) + ss.total_premium);
        assert_eq!(ss.lower_breakeven, dec!(100) - ss.total_premium);
        assert_eq!(strategies[0].max_loss(), Payoff::Unbounded);
    }

    #[test]
    fn test_neutral_without_nearby_strike_is_empty() {
        let spot = dec!(103);
        let chain = manual_chain(spot, &[(dec!(90), dec!(14), dec!(1)), (dec!(110), dec!(1), dec!(7))]);
        let strategies = StrategySynthesizer::new(dec!(5)).synthesize(&chain, Outlook::Neutral);
        assert!(strategies.is_empty());
    }

    #[test]
    fn test_straddle_picks_nearest_within_half_tick() {
        let spot = dec!(101);
        let chain = manual_chain(
            spot,
            &[(dec!(95), dec!(7), dec!(1)), (dec!(100), dec!(3), dec!(2)), (dec!(105), dec!(1), dec!(5))],
        );
        let strategies = StrategySynthesizer::new(dec!(5)).synthesize(&chain, Outlook::Neutral);
        let Strategy::ShortStraddle(ss) = &strategies[0] else {
            panic!("expected Short Straddle");
        };
        assert_eq!(ss.call.strike, dec!(100));
        assert_eq!(ss.total_premium, dec!(5));
    }

    #[test]
    fn test_bullish_without_atm_keeps_spread() {
        let spot = dec!(102);
        let chain = manual_chain(
            spot,
            &[(dec!(95), dec!(8), dec!(1)), (dec!(100), dec!(4), dec!(2)), (dec!(105), dec!(1), dec!(4))],
        );
        let strategies = StrategySynthesizer::new(dec!(5)).synthesize(&chain, Outlook::Bullish);
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].name(), "Bull Call Spread");
    }

    #[test]
    fn test_spread_skips_zero_premium() {
        let spot = dec!(100);
        let chain = manual_chain(
            spot,
            &[(dec!(90), dec!(11), dec!(0)), (dec!(100), dec!(3), dec!(3)), (dec!(120), dec!(0), dec!(20))],
        );
        let synth = StrategySynthesizer::new(dec!(5));
        assert!(synth.bull_call_spread(&chain).is_none());
        assert!(synth.long_call(&chain).is_some());
    }

    #[test]
    fn test_empty_chain() {
        let chain = manual_chain(dec!(100), &[]);
        let synth = StrategySynthesizer::new(dec!(50));
        for outlook in [Outlook::Bullish, Outlook::Bearish, Outlook::Neutral] {
            assert!(synth.synthesize(&chain, outlook).is_empty());
        }
    }
}
