//! Engine configuration.
//!
//! Every threshold, period and band the engine uses lives here with its
//! default. Configuration files are TOML; omitted keys keep their defaults.
//!
//! ```toml
//! [indicators]
//! ema_fast = 9
//! ema_slow = 21
//!
//! [chain]
//! strike_tick = 100.0
//! expiry_days = 45
//!
//! [recommendations]
//! max_recommendations = 1
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicators::IndicatorConfig;
use crate::pricing::ChainConfig;
use crate::recommend::RecommendationConfig;
use crate::signals::SignalClassifierConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indicators: IndicatorConfig,
    pub signals: SignalClassifierConfig,
    pub chain: ChainConfig,
    pub recommendations: RecommendationConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ind = &self.indicators;
        let periods = [
            ("indicators.ema_fast", ind.ema_fast),
            ("indicators.ema_slow", ind.ema_slow),
            ("indicators.macd_fast", ind.macd_fast),
            ("indicators.macd_slow", ind.macd_slow),
            ("indicators.macd_signal", ind.macd_signal),
            ("indicators.rsi_period", ind.rsi_period),
            ("indicators.bollinger_period", ind.bollinger_period),
            ("indicators.atr_period", ind.atr_period),
            ("indicators.supertrend_period", ind.supertrend_period),
            ("indicators.adx_period", ind.adx_period),
            ("indicators.volume_profile_bins", ind.volume_profile_bins),
            ("recommendations.short_window", self.recommendations.short_window),
            ("recommendations.long_window", self.recommendations.long_window),
            ("recommendations.change_lookback", self.recommendations.change_lookback),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, v)| *v == 0) {
            return Err(invalid(format!("{name} must be positive")));
        }
        if ind.bollinger_period < 2 {
            return Err(invalid("indicators.bollinger_period must be at least 2"));
        }
        if ind.macd_fast >= ind.macd_slow {
            return Err(invalid("indicators.macd_fast must be below macd_slow"));
        }
        if ind.bollinger_width < 0.0 || ind.supertrend_multiplier < 0.0 {
            return Err(invalid("indicator widths and multipliers must be non-negative"));
        }

        if self.signals.rsi_oversold >= self.signals.rsi_overbought {
            return Err(invalid("signals.rsi_oversold must be below rsi_overbought"));
        }

        let chain = &self.chain;
        if !positive(chain.strike_tick) {
            return Err(invalid("chain.strike_tick must be positive"));
        }
        if chain.strike_offsets_pct.is_empty() {
            return Err(invalid("chain.strike_offsets_pct must not be empty"));
        }
        if !positive(chain.default_volatility) || !positive(chain.trading_days_per_year) {
            return Err(invalid(
                "chain.default_volatility and trading_days_per_year must be positive",
            ));
        }

        let rec = &self.recommendations;
        for (name, band) in [
            ("recommendations.strong_confidence", rec.strong_confidence),
            ("recommendations.base_confidence", rec.base_confidence),
        ] {
            if !(0.0..=1.0).contains(&band) {
                return Err(invalid(format!("{name} must be within [0, 1]")));
            }
        }

        Ok(())
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}
