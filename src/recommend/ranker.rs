//! Recommendation ranker.
//!
//! Scores synthesized strategies by how well the recent price trend agrees
//! with the outlook and keeps the first N.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::Bar;
use crate::signals::Outlook;
use crate::strategy::{Payoff, RiskLevel, Strategy};

/// Ranker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Confidence when the trend agrees with the outlook.
    pub strong_confidence: f64,
    /// Confidence otherwise.
    pub base_confidence: f64,
    /// Short SMA window (bars).
    pub short_window: usize,
    /// Long SMA window (bars).
    pub long_window: usize,
    /// Bars back for the price change.
    pub change_lookback: usize,
    /// Percent change required for a directional trend.
    pub change_threshold_pct: f64,
    pub max_recommendations: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            strong_confidence: 0.8,
            base_confidence: 0.6,
            short_window: 5,
            long_window: 20,
            change_lookback: 5,
            change_threshold_pct: 2.0, // percent
            max_recommendations: 2,
        }
    }
}

/// Moving-average cross and recent change over a bar window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendAlignment {
    pub short_sma: f64,
    pub long_sma: f64,
    /// Percent change over the lookback.
    pub change_pct: f64,
    /// Bullish or bearish only when the cross and the change agree.
    pub direction: Outlook,
}

/// A strategy with its confidence and reasoning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub symbol: String,
    pub name: &'static str,
    pub description: &'static str,
    /// Qualitative label such as "Limited Risk, Limited Reward".
    pub risk_reward: &'static str,
    pub strategy: Strategy,
    pub confidence: f64,
    pub outlook: Outlook,
    pub reasoning: String,
    pub risk_level: RiskLevel,
    pub max_profit: Payoff,
    pub max_loss: Payoff,
}

/// Recommendation ranker.
#[derive(Debug, Clone, Default)]
pub struct RecommendationRanker {
    config: RecommendationConfig,
}

impl RecommendationRanker {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    /// Trend over the closes, or `None` when the window is shorter than the
    /// long SMA or the change lookback.
    pub fn trend_alignment(&self, bars: &[Bar]) -> Option<TrendAlignment> {
        let needed = self
            .config
            .long_window
            .max(self.config.short_window)
            .max(self.config.change_lookback + 1);
        if self.config.short_window == 0 || self.config.long_window == 0 || bars.len() < needed {
            return None;
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let short_sma = sma(&closes, self.config.short_window);
        let long_sma = sma(&closes, self.config.long_window);

        let last = closes[closes.len() - 1];
        let base = closes[closes.len() - 1 - self.config.change_lookback];
        if base <= 0.0 {
            return None;
        }
        let change_pct = (last / base - 1.0) * 100.0;

        let threshold = self.config.change_threshold_pct;
        let direction = if short_sma > long_sma && change_pct > threshold {
            Outlook::Bullish
        } else if short_sma < long_sma && change_pct < -threshold {
            Outlook::Bearish
        } else {
            Outlook::Neutral
        };

        Some(TrendAlignment {
            short_sma,
            long_sma,
            change_pct,
            direction,
        })
    }

    /// Strong confidence when a directional trend matches the outlook.
    pub fn confidence(&self, outlook: Outlook, alignment: Option<&TrendAlignment>) -> f64 {
        match alignment {
            Some(a) if a.direction != Outlook::Neutral && a.direction == outlook => {
                self.config.strong_confidence
            }
            _ => self.config.base_confidence,
        }
    }

    /// Turn the first N strategies into recommendations, in the order given.
    pub fn rank(
        &self,
        symbol: &str,
        bars: &[Bar],
        outlook: Outlook,
        strategies: &[Strategy],
    ) -> Vec<Recommendation> {
        let alignment = self.trend_alignment(bars);
        let confidence = self.confidence(outlook, alignment.as_ref());
        let price = bars.last().map(|b| b.close).unwrap_or(0.0);

        debug!(
            "{}: {} outlook, confidence {:.2}, {} candidate strategies",
            symbol,
            outlook,
            confidence,
            strategies.len()
        );

        strategies
            .iter()
            .take(self.config.max_recommendations)
            .map(|strategy| Recommendation {
                symbol: symbol.to_string(),
                name: strategy.name(),
                description: strategy.description(),
                risk_reward: strategy.risk_reward(),
                strategy: strategy.clone(),
                confidence,
                outlook,
                reasoning: reasoning(outlook, confidence, price),
                risk_level: strategy.risk_level(),
                max_profit: strategy.max_profit(),
                max_loss: strategy.max_loss(),
            })
            .collect()
    }
}

fn sma(values: &[f64], window: usize) -> f64 {
    let tail = &values[values.len() - window..];
    tail.iter().sum::<f64>() / window as f64
}

fn reasoning(outlook: Outlook, confidence: f64, price: f64) -> String {
    format!(
        "Based on {} outlook with {:.0}% confidence. Current price: {:.2}",
        outlook,
        confidence * 100.0,
        price
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::{bars_from_closes, flat_bars};
    use crate::pricing::{ChainConfig, OptionsChainBuilder};
    use crate::strategy::StrategySynthesizer;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn rising(n: usize, step: f64) -> Vec<Bar> {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 * step).collect();
        bars_from_closes(&closes)
    }

    fn bullish_strategies() -> Vec<Strategy> {
        let chain = OptionsChainBuilder::new(ChainConfig {
            strike_tick: 5.0,
            ..ChainConfig::default()
        })
        .build_with_volatility(100.0, 0.2)
        .unwrap();
        StrategySynthesizer::new(dec!(5)).synthesize(&chain, Outlook::Bullish)
    }

    #[test]
    fn test_default_config() {
        let config = RecommendationConfig::default();
        assert_eq!(config.strong_confidence, 0.8);
        assert_eq!(config.base_confidence, 0.6);
        assert_eq!(config.max_recommendations, 2);
    }

    #[test]
    fn test_trend_alignment_uptrend() {
        let ranker = RecommendationRanker::default();
        let a = ranker.trend_alignment(&rising(30, 1.0)).unwrap();
        // Last 5 closes 125..129, last 20 closes 110..129.
        assert_relative_eq!(a.short_sma, 127.0);
        assert_relative_eq!(a.long_sma, 119.5);
        assert_relative_eq!(a.change_pct, (129.0 / 124.0 - 1.0) * 100.0, epsilon = 1e-9);
        assert_eq!(a.direction, Outlook::Bullish);
    }

    #[test]
    fn test_trend_alignment_requires_long_window() {
        let ranker = RecommendationRanker::default();
        assert!(ranker.trend_alignment(&rising(19, 1.0)).is_none());
        assert!(ranker.trend_alignment(&rising(20, 1.0)).is_some());
    }

    #[test]
    fn test_small_change_is_neutral() {
        let ranker = RecommendationRanker::default();
        let a = ranker.trend_alignment(&rising(30, 0.1)).unwrap();
        assert!(a.short_sma > a.long_sma);
        assert_eq!(a.direction, Outlook::Neutral);
    }

    #[test]
    fn test_confidence_bands() {
        let ranker = RecommendationRanker::default();
        let up = ranker.trend_alignment(&rising(30, 1.0));
        assert_eq!(ranker.confidence(Outlook::Bullish, up.as_ref()), 0.8);
        assert_eq!(ranker.confidence(Outlook::Bearish, up.as_ref()), 0.6);
        assert_eq!(ranker.confidence(Outlook::Bullish, None), 0.6);

        let flat = ranker.trend_alignment(&flat_bars(30, 100.0));
        assert_eq!(ranker.confidence(Outlook::Neutral, flat.as_ref()), 0.6);
    }

    #[test]
    fn test_rank_takes_first_n_in_order() {
        let ranker = RecommendationRanker::default();
        let strategies = bullish_strategies();
        let bars = rising(30, 1.0);
        let recs = ranker.rank("NIFTY", &bars, Outlook::Bullish, &strategies);

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].strategy.name(), "Long Call");
        assert_eq!(recs[1].strategy.name(), "Bull Call Spread");
        assert_eq!(recs[0].name, "Long Call");
        assert_eq!(recs[0].risk_reward, "High Risk, High Reward");
        assert_eq!(recs[1].risk_reward, "Limited Risk, Limited Reward");
        assert_eq!(recs[0].description, "Buy call option for bullish outlook");
        assert_eq!(recs[0].risk_level, RiskLevel::Medium);
        assert_eq!(recs[1].risk_level, RiskLevel::Low);
        assert!(recs[0].max_profit.is_unbounded());
        assert_eq!(
            recs[0].reasoning,
            "Based on bullish outlook with 80% confidence. Current price: 129.00"
        );
    }

    #[test]
    fn test_serialized_recommendation_carries_labels() {
        let recs = RecommendationRanker::default().rank(
            "NIFTY",
            &rising(30, 1.0),
            Outlook::Bullish,
            &bullish_strategies(),
        );
        let json = serde_json::to_value(&recs[1]).unwrap();
        assert_eq!(json["name"], "Bull Call Spread");
        assert_eq!(json["risk_reward"], "Limited Risk, Limited Reward");
        assert_eq!(json["risk_level"], "LOW");
        assert_eq!(json["strategy"]["strategy"], "bull_call_spread");
    }

    #[test]
    fn test_rank_limit() {
        let ranker = RecommendationRanker::new(RecommendationConfig {
            max_recommendations: 1,
            ..RecommendationConfig::default()
        });
        let recs = ranker.rank("X", &rising(30, 1.0), Outlook::Bullish, &bullish_strategies());
        assert_eq!(recs.len(), 1);

        let none = ranker.rank("X", &rising(30, 1.0), Outlook::Bullish, &[]);
        assert!(none.is_empty());
    }
}
