//! Provider abstraction for historical daily bars.
//!
//! The analyzer depends only on [`DataProvider`], so the HTTP-backed
//! [`YahooClient`](super::YahooClient) can be swapped for an in-memory
//! provider in tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::market_data::PriceBar;
use crate::types::Period;

#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetch daily bars for an already-normalised `symbol` over `period`.
    ///
    /// An empty vector is a legal answer (unknown or delisted symbol); the
    /// caller decides how to treat it.
    async fn fetch_daily_bars(&self, symbol: &str, period: Period) -> Result<Vec<PriceBar>>;
}
