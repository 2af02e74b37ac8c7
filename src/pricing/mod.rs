//! Options pricing.
//!
//! Provides:
//! - Black-Scholes-Merton price and Greeks
//! - Realized volatility estimation from bars
//! - Strike ladder generation
//! - Priced call/put chains

pub mod black_scholes;
pub mod chain;
pub mod strikes;
pub mod volatility;

pub use black_scholes::{ContractQuote, OptionPricer, PricingError};
pub use chain::{ChainConfig, OptionsChainBuilder};
pub use strikes::{StrikeLadderBuilder, DEFAULT_STRIKE_OFFSETS_PCT};
pub use volatility::{VolatilityEstimator, DEFAULT_VOLATILITY, TRADING_DAYS_PER_YEAR};
