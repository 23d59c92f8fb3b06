pub mod provider;
pub mod series;
pub mod yahoo;

// Re-export the core types for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use provider::DataProvider;
pub use series::{IndicatorColumns, PriceBar, PriceSeries};
pub use yahoo::YahooClient;
