//! Core data types shared by the indicator and options engines.
//!
//! Bars are plain `f64` because every indicator works in floating point.
//! Strikes and premiums are `Decimal` so that strike ladders land exactly on
//! tick multiples and strategy arithmetic (breakevens, net premium) is exact.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(
        timestamp: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check the OHLC envelope and volume sign.
    pub fn check(&self) -> Result<(), &'static str> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err("non-finite price");
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err("volume must be finite and non-negative");
        }
        if self.high < self.open.max(self.close).max(self.low) {
            return Err("high below open/close/low");
        }
        if self.low > self.open.min(self.close).min(self.high) {
            return Err("low above open/close/high");
        }
        Ok(())
    }

    /// (H + L + C) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// (H + L) / 2
    pub fn hl2(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::Put => "PUT",
        }
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "C" | "CALL" => Ok(Self::Call),
            "P" | "PUT" => Ok(Self::Put),
            other => Err(format!("unknown option type: {other}")),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a strike sits relative to spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Moneyness {
    Itm,
    Atm,
    Otm,
}

impl Moneyness {
    /// Call moneyness: strike below spot is in the money.
    pub fn for_call(strike: Decimal, spot: Decimal) -> Self {
        if strike < spot {
            Self::Itm
        } else if strike > spot {
            Self::Otm
        } else {
            Self::Atm
        }
    }

    /// Put moneyness: strike above spot is in the money.
    pub fn for_put(strike: Decimal, spot: Decimal) -> Self {
        if strike > spot {
            Self::Itm
        } else if strike < spot {
            Self::Otm
        } else {
            Self::Atm
        }
    }

    pub fn of(option_type: OptionType, strike: Decimal, spot: Decimal) -> Self {
        match option_type {
            OptionType::Call => Self::for_call(strike, spot),
            OptionType::Put => Self::for_put(strike, spot),
        }
    }
}

/// First-order sensitivities of an option contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    /// Per calendar day.
    pub theta: f64,
    /// Per 1% move in volatility.
    pub vega: f64,
}

/// A priced option contract within a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: Decimal,
    pub option_type: OptionType,
    /// Theoretical premium, rounded to cents. Never negative.
    pub premium: Decimal,
    pub greeks: Greeks,
    pub moneyness: Moneyness,
}

/// Call and put priced at the same strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeRow {
    pub strike: Decimal,
    pub call: OptionQuote,
    pub put: OptionQuote,
}

/// A fully priced chain for one expiry.
///
/// Rows are strictly increasing and unique by strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsChain {
    pub spot: Decimal,
    pub implied_volatility: f64,
    pub expiry_days: u32,
    pub risk_free_rate: f64,
    pub rows: Vec<StrikeRow>,
}

impl OptionsChain {
    pub fn calls(&self) -> impl Iterator<Item = &OptionQuote> {
        self.rows.iter().map(|r| &r.call)
    }

    pub fn puts(&self) -> impl Iterator<Item = &OptionQuote> {
        self.rows.iter().map(|r| &r.put)
    }

    /// Find a call at a specific strike.
    pub fn call_at_strike(&self, strike: Decimal) -> Option<&OptionQuote> {
        self.calls().find(|q| q.strike == strike)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Convert a float price into a `Decimal`, dropping binary noise past 8 places.
pub fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(8).normalize())
        .unwrap_or_default()
}
