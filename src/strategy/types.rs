//! Strategy definitions.
//!
//! The strategy set is closed: each variant carries a fixed, typed leg list
//! and its own profit/loss/breakeven fields.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::data::OptionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

/// One option leg of a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyLeg {
    pub action: Action,
    pub option_type: OptionType,
    pub strike: Decimal,
    pub premium: Decimal,
}

impl StrategyLeg {
    pub fn buy(option_type: OptionType, strike: Decimal, premium: Decimal) -> Self {
        Self {
            action: Action::Buy,
            option_type,
            strike,
            premium,
        }
    }

    pub fn sell(option_type: OptionType, strike: Decimal, premium: Decimal) -> Self {
        Self {
            action: Action::Sell,
            option_type,
            strike,
            premium,
        }
    }
}

/// Maximum profit or loss of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payoff {
    Limited(Decimal),
    Unbounded,
}

impl Payoff {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

/// Coarse risk bucket for a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Buy one call. Unbounded upside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongCall {
    pub leg: StrategyLeg,
    pub max_loss: Decimal,
    pub breakeven: Decimal,
}

/// Buy a lower-strike call, sell a higher-strike call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BullCallSpread {
    pub long: StrategyLeg,
    pub short: StrategyLeg,
    /// Long premium minus short premium.
    pub net_premium: Decimal,
    pub max_profit: Decimal,
    pub max_loss: Decimal,
    pub breakeven: Decimal,
}

/// Buy one put.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongPut {
    pub leg: StrategyLeg,
    pub max_profit: Decimal,
    pub max_loss: Decimal,
    pub breakeven: Decimal,
}

/// Sell a call and a put at the same strike. Unbounded downside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortStraddle {
    pub call: StrategyLeg,
    pub put: StrategyLeg,
    pub total_premium: Decimal,
    pub max_profit: Decimal,
    pub lower_breakeven: Decimal,
    pub upper_breakeven: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    LongCall(LongCall),
    BullCallSpread(BullCallSpread),
    LongPut(LongPut),
    ShortStraddle(ShortStraddle),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LongCall(_) => "Long Call",
            Self::BullCallSpread(_) => "Bull Call Spread",
            Self::LongPut(_) => "Long Put",
            Self::ShortStraddle(_) => "Short Straddle",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::LongCall(_) => "Buy call option for bullish outlook",
            Self::BullCallSpread(_) => "Buy lower strike call, sell higher strike call",
            Self::LongPut(_) => "Buy put option for bearish outlook",
            Self::ShortStraddle(_) => "Sell call and put at same strike for neutral outlook",
        }
    }

    pub fn legs(&self) -> Vec<&StrategyLeg> {
        match self {
            Self::LongCall(s) => vec![&s.leg],
            Self::BullCallSpread(s) => vec![&s.long, &s.short],
            Self::LongPut(s) => vec![&s.leg],
            Self::ShortStraddle(s) => vec![&s.call, &s.put],
        }
    }

    pub fn max_profit(&self) -> Payoff {
        match self {
            Self::LongCall(_) => Payoff::Unbounded,
            Self::BullCallSpread(s) => Payoff::Limited(s.max_profit),
            Self::LongPut(s) => Payoff::Limited(s.max_profit),
            Self::ShortStraddle(s) => Payoff::Limited(s.max_profit),
        }
    }

    pub fn max_loss(&self) -> Payoff {
        match self {
            Self::LongCall(s) => Payoff::Limited(s.max_loss),
            Self::BullCallSpread(s) => Payoff::Limited(s.max_loss),
            Self::LongPut(s) => Payoff::Limited(s.max_loss),
            Self::ShortStraddle(_) => Payoff::Unbounded,
        }
    }

    /// One breakeven, or lower and upper for the straddle.
    pub fn breakevens(&self) -> Vec<Decimal> {
        match self {
            Self::LongCall(s) => vec![s.breakeven],
            Self::BullCallSpread(s) => vec![s.breakeven],
            Self::LongPut(s) => vec![s.breakeven],
            Self::ShortStraddle(s) => vec![s.lower_breakeven, s.upper_breakeven],
        }
    }

    pub fn risk_reward(&self) -> &'static str {
        match self {
            Self::LongCall(_) | Self::LongPut(_) => "High Risk, High Reward",
            Self::BullCallSpread(_) => "Limited Risk, Limited Reward",
            Self::ShortStraddle(_) => "Limited Profit, Unlimited Risk",
        }
    }

    /// Unbounded loss is high risk, a debit spread is low, a single long
    /// option is medium.
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            Self::ShortStraddle(_) => RiskLevel::High,
            Self::BullCallSpread(_) => RiskLevel::Low,
            Self::LongCall(_) | Self::LongPut(_) => RiskLevel::Medium,
        }
    }
}
