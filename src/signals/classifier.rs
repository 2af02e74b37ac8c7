//! Indicator signal classifier.
//!
//! Maps the latest value of each indicator to a categorical signal and
//! aggregates a directional outlook by counting bullish-leaning against
//! bearish-leaning signals.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{BollingerBands, IndicatorSet, Macd, Supertrend, Trend};

/// Categorical reading for one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Bullish,
    Bearish,
    Overbought,
    Oversold,
    Neutral,
}

impl Signal {
    /// Direction this signal leans toward, if any.
    ///
    /// Oversold leans bullish (expected bounce); overbought leans bearish.
    pub fn leaning(&self) -> Option<Outlook> {
        match self {
            Self::Bullish | Self::Oversold => Some(Outlook::Bullish),
            Self::Bearish | Self::Overbought => Some(Outlook::Bearish),
            Self::Neutral => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Overbought => "overbought",
            Self::Oversold => "oversold",
            Self::Neutral => "neutral",
        }
    }
}

/// Directional market outlook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outlook {
    Bullish,
    Bearish,
    Neutral,
}

impl Outlook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

impl FromStr for Outlook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bullish" | "bull" => Ok(Self::Bullish),
            "bearish" | "bear" => Ok(Self::Bearish),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("unknown outlook: {other}")),
        }
    }
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalClassifierConfig {
    /// RSI above this is overbought.
    pub rsi_overbought: f64,
    /// RSI below this is oversold.
    pub rsi_oversold: f64,
}

impl Default for SignalClassifierConfig {
    fn default() -> Self {
        Self {
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
        }
    }
}

/// Per-indicator signals plus the aggregated outlook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSummary {
    pub signals: BTreeMap<&'static str, Signal>,
    pub bullish_count: usize,
    pub bearish_count: usize,
    pub overall: Outlook,
}

/// Signal classifier.
#[derive(Debug, Clone, Default)]
pub struct SignalClassifier {
    config: SignalClassifierConfig,
}

impl SignalClassifier {
    pub fn new(config: SignalClassifierConfig) -> Self {
        Self { config }
    }

    pub fn rsi(&self, value: f64) -> Signal {
        if value > self.config.rsi_overbought {
            Signal::Overbought
        } else if value < self.config.rsi_oversold {
            Signal::Oversold
        } else {
            Signal::Neutral
        }
    }

    pub fn macd(&self, macd: &Macd) -> Signal {
        if macd.macd > macd.signal {
            Signal::Bullish
        } else {
            Signal::Bearish
        }
    }

    pub fn bollinger(&self, close: f64, bands: &BollingerBands) -> Signal {
        if close > bands.upper {
            Signal::Overbought
        } else if close < bands.lower {
            Signal::Oversold
        } else {
            Signal::Neutral
        }
    }

    pub fn supertrend(&self, supertrend: &Supertrend) -> Signal {
        match supertrend.trend {
            Trend::Bullish => Signal::Bullish,
            Trend::Bearish => Signal::Bearish,
        }
    }

    pub fn ema_cross(&self, fast: f64, slow: f64) -> Signal {
        if fast > slow {
            Signal::Bullish
        } else {
            Signal::Bearish
        }
    }

    /// Classify every available indicator; missing ones produce no signal.
    pub fn classify(&self, set: &IndicatorSet) -> SignalSummary {
        let mut signals = BTreeMap::new();

        if let Ok(rsi) = &set.rsi {
            signals.insert("rsi", self.rsi(*rsi));
        }
        if let Ok(macd) = &set.macd {
            signals.insert("macd", self.macd(macd));
        }
        if let (Ok(bands), Some(close)) = (&set.bollinger, set.last_close) {
            signals.insert("bollinger", self.bollinger(close, bands));
        }
        if let Ok(st) = &set.supertrend {
            signals.insert("supertrend", self.supertrend(st));
        }
        if let (Ok(fast), Ok(slow)) = (&set.ema_fast, &set.ema_slow) {
            signals.insert("ema", self.ema_cross(*fast, *slow));
        }

        Self::aggregate(signals)
    }

    /// Count leanings and pick the majority; ties are neutral.
    pub fn aggregate(signals: BTreeMap<&'static str, Signal>) -> SignalSummary {
        let bullish_count = signals
            .values()
            .filter(|s| s.leaning() == Some(Outlook::Bullish))
            .count();
        let bearish_count = signals
            .values()
            .filter(|s| s.leaning() == Some(Outlook::Bearish))
            .count();

        let overall = if bullish_count > bearish_count {
            Outlook::Bullish
        } else if bearish_count > bullish_count {
            Outlook::Bearish
        } else {
            Outlook::Neutral
        };

        debug!(
            "Signals: {} bullish, {} bearish -> {}",
            bullish_count, bearish_count, overall
        );

        SignalSummary {
            signals,
            bullish_count,
            bearish_count,
            overall,
        }
    }
}
