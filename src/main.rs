//! quant-signals CLI
//!
//! # Usage
//!
//! ```bash
//! # Full analysis of one symbol
//! quant-signals analyze --bars data/nifty.csv --symbol NIFTY
//!
//! # Force the outlook used for strategy selection
//! quant-signals analyze --bars data/nifty.csv --symbol NIFTY --outlook neutral
//!
//! # Priced chain only
//! quant-signals chain --bars data/nifty.csv --config config/default.toml
//!
//! # One contract
//! quant-signals greeks --spot 22000 --strike 22100 --expiry-days 30 --volatility 0.18
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use quant_signals::{load_bars, Analyzer, EngineConfig, OptionPricer, OptionType, Outlook};

#[derive(Parser)]
#[command(name = "quant-signals")]
#[command(about = "Technical indicators, option pricing and strategy recommendations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Indicators, signals, chain, strategies and recommendations for one symbol
    Analyze {
        /// Path to OHLCV CSV
        #[arg(short, long)]
        bars: PathBuf,

        /// Symbol label for the output
        #[arg(short, long)]
        symbol: String,

        /// Path to TOML configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the signal-derived outlook (bullish, bearish, neutral)
        #[arg(long)]
        outlook: Option<Outlook>,
    },

    /// Price the options chain at the last close
    Chain {
        /// Path to OHLCV CSV
        #[arg(short, long)]
        bars: PathBuf,

        /// Path to TOML configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Calendar days to expiry
        #[arg(long)]
        expiry_days: Option<u32>,
    },

    /// Price and Greeks for a single contract
    Greeks {
        #[arg(long)]
        spot: f64,

        #[arg(long)]
        strike: f64,

        #[arg(long)]
        expiry_days: u32,

        /// Annualized volatility (0.2 = 20%)
        #[arg(long)]
        volatility: f64,

        #[arg(long, default_value_t = 0.06)]
        rate: f64,

        #[arg(long, default_value = "call")]
        option_type: OptionType,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("quant_signals=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            bars,
            symbol,
            config,
            outlook,
        } => {
            let config = load_config(config.as_deref())?;
            let bars = load_bars(&bars)
                .with_context(|| format!("Failed to load bars from {}", bars.display()))?;
            info!("Analyzing {} over {} bars", symbol, bars.len());

            let analysis = Analyzer::new(config)
                .analyze_with_outlook(&symbol, &bars, outlook)
                .context("Analysis failed")?;
            print_json(&analysis)?;
        }
        Commands::Chain {
            bars,
            config,
            expiry_days,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(days) = expiry_days {
                config.chain.expiry_days = days;
            }
            let bars = load_bars(&bars)
                .with_context(|| format!("Failed to load bars from {}", bars.display()))?;
            let spot = bars.last().map(|b| b.close).context("Bar file is empty")?;

            let chain = Analyzer::new(config)
                .chain_builder()
                .build(spot, &bars)
                .context("Failed to price chain")?;
            print_json(&chain)?;
        }
        Commands::Greeks {
            spot,
            strike,
            expiry_days,
            volatility,
            rate,
            option_type,
        } => {
            let time = expiry_days as f64 / 365.0;
            let quote = OptionPricer::new(rate)
                .quote(spot, strike, time, volatility, option_type)
                .context("Failed to price contract")?;
            print_json(&quote)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
