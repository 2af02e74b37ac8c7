//! End-to-end analysis of one or many symbols.
//!
//! bars -> indicators -> signals -> chain -> strategies -> recommendations

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::data::{Bar, OptionsChain};
use crate::indicators::IndicatorSet;
use crate::pricing::{OptionsChainBuilder, PricingError};
use crate::recommend::{Recommendation, RecommendationRanker};
use crate::signals::{Outlook, SignalClassifier, SignalSummary};
use crate::strategy::{Strategy, StrategySynthesizer};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("{symbol}: no bars to analyze")]
    NoBars { symbol: String },
}

/// Everything computed for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub last_close: f64,
    pub indicators: IndicatorSet,
    pub signals: SignalSummary,
    /// Outlook used for strategy selection.
    pub outlook: Outlook,
    pub chain: Result<OptionsChain, PricingError>,
    pub strategies: Vec<Strategy>,
    pub recommendations: Vec<Recommendation>,
}

/// Pipeline wired from one [`EngineConfig`].
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: EngineConfig,
    classifier: SignalClassifier,
    chain_builder: OptionsChainBuilder,
    synthesizer: StrategySynthesizer,
    ranker: RecommendationRanker,
}

impl Analyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            classifier: SignalClassifier::new(config.signals.clone()),
            chain_builder: OptionsChainBuilder::new(config.chain.clone()),
            synthesizer: StrategySynthesizer::new(config.chain.tick()),
            ranker: RecommendationRanker::new(config.recommendations.clone()),
            config,
        }
    }

    pub fn chain_builder(&self) -> &OptionsChainBuilder {
        &self.chain_builder
    }

    /// Analyze with the outlook derived from the signals.
    pub fn analyze(&self, symbol: &str, bars: &[Bar]) -> Result<SymbolAnalysis, AnalysisError> {
        self.analyze_with_outlook(symbol, bars, None)
    }

    /// Analyze, optionally forcing the outlook used for strategy selection.
    pub fn analyze_with_outlook(
        &self,
        symbol: &str,
        bars: &[Bar],
        outlook: Option<Outlook>,
    ) -> Result<SymbolAnalysis, AnalysisError> {
        let last_close = bars
            .last()
            .map(|b| b.close)
            .ok_or_else(|| AnalysisError::NoBars {
                symbol: symbol.to_string(),
            })?;

        let indicators = IndicatorSet::compute(bars, &self.config.indicators);
        let signals = self.classifier.classify(&indicators);
        let outlook = outlook.unwrap_or(signals.overall);

        let chain = self.chain_builder.build(last_close, bars);
        let strategies = match &chain {
            Ok(chain) => self.synthesizer.synthesize(chain, outlook),
            Err(e) => {
                warn!("{}: chain unavailable: {}", symbol, e);
                Vec::new()
            }
        };
        let recommendations = self.ranker.rank(symbol, bars, outlook, &strategies);

        Ok(SymbolAnalysis {
            symbol: symbol.to_string(),
            last_close,
            indicators,
            signals,
            outlook,
            chain,
            strategies,
            recommendations,
        })
    }
}

/// Analyze one symbol with a fresh [`Analyzer`].
pub fn analyze_symbol(
    symbol: &str,
    bars: &[Bar],
    config: &EngineConfig,
) -> Result<SymbolAnalysis, AnalysisError> {
    Analyzer::new(config.clone()).analyze(symbol, bars)
}

/// Analyze many symbols in parallel. Results keep the input order.
pub fn analyze_batch(
    inputs: &[(String, Vec<Bar>)],
    config: &EngineConfig,
) -> Vec<Result<SymbolAnalysis, AnalysisError>> {
    let analyzer = Analyzer::new(config.clone());

    inputs
        .par_iter()
        .map(|(symbol, bars)| {
            let result = analyzer.analyze(symbol, bars);
            if let Ok(analysis) = &result {
                info!(
                    "{}: {} outlook, {} recommendations",
                    symbol,
                    analysis.outlook,
                    analysis.recommendations.len()
                );
            }
            result
        })
        .collect()
}
