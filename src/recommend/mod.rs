//! Confidence-scored strategy recommendations.

pub mod ranker;

pub use ranker::{Recommendation, RecommendationConfig, RecommendationRanker, TrendAlignment};
