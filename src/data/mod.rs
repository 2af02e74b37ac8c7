pub mod loader;
pub mod types;

pub use loader::{load_bars, read_bars, LoaderError};
pub use types::{
    decimal_from_f64, Bar, Greeks, Moneyness, OptionQuote, OptionType, OptionsChain, StrikeRow,
};
