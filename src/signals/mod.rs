//! Indicator signal classification.
//!
//! Thresholds per indicator:
//! - RSI: > 70 overbought, < 30 oversold
//! - MACD: line above signal is bullish
//! - Bollinger: close above upper band overbought, below lower oversold
//! - Supertrend: trend passed through
//! - EMA: fast above slow is bullish

pub mod classifier;

pub use classifier::{Outlook, Signal, SignalClassifier, SignalClassifierConfig, SignalSummary};
