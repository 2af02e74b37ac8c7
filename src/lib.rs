pub mod config;
pub mod data;
pub mod indicators;
pub mod pipeline;
pub mod pricing;
pub mod recommend;
pub mod signals;
pub mod strategy;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig};
pub use data::{load_bars, Bar, LoaderError, OptionQuote, OptionType, OptionsChain};
pub use indicators::{IndicatorConfig, IndicatorError, IndicatorSet};
pub use pipeline::{analyze_batch, analyze_symbol, AnalysisError, Analyzer, SymbolAnalysis};
pub use pricing::{OptionPricer, OptionsChainBuilder, PricingError, VolatilityEstimator};
pub use recommend::{Recommendation, RecommendationRanker};
pub use signals::{Outlook, SignalClassifier, SignalSummary};
pub use strategy::{Strategy, StrategySynthesizer};
