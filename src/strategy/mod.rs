//! Option strategy synthesis.
//!
//! Turns a priced chain and a directional outlook into concrete multi-leg
//! positions with profit, loss and breakeven figures.

pub mod synthesizer;
pub mod types;

pub use synthesizer::StrategySynthesizer;
pub use types::{
    Action, BullCallSpread, LongCall, LongPut, Payoff, RiskLevel, ShortStraddle, Strategy,
    StrategyLeg,
};
