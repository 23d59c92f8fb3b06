// =============================================================================
// Yahoo Finance chart client — daily OHLCV history
// =============================================================================
//
// Public endpoint, no authentication.  Yahoo rejects requests without a
// browser-like User-Agent, so one is installed as a default header.
//
// Response shape (only the fields we read):
//   { "chart": { "result": [ { "meta": { "gmtoffset": 19800 },
//                              "timestamp": [..],
//                              "indicators": { "quote": [ { "open": [..], .. } ],
//                                              "adjclose": [ { "adjclose": [..] } ] } } ],
//                "error": null } }
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::ProviderConfig;
use crate::market_data::{DataProvider, PriceBar};
use crate::types::Period;

/// Bar interval requested from the chart endpoint.
const DAILY_INTERVAL: &str = "1d";

/// HTTP client for the Yahoo Finance v8 chart API.
#[derive(Clone)]
pub struct YahooClient {
    base_url: Url,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("invalid provider base_url '{}'", config.base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("provider base_url '{}' cannot carry a path", config.base_url);
        }

        let mut default_headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .context("provider user_agent is not a valid header value")?;
        default_headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    /// The symbol is pushed as a single, percent-encoded path segment.
    fn chart_url(&self, symbol: &str, period: Period) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("provider base_url cannot carry a path"))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", symbol]);
        url.query_pairs_mut()
            .append_pair("range", period.as_str())
            .append_pair("interval", DAILY_INTERVAL)
            .append_pair("includePrePost", "false");
        Ok(url)
    }
}

#[async_trait]
impl DataProvider for YahooClient {
    /// GET /v8/finance/chart/{symbol} (public).
    #[instrument(skip(self), name = "yahoo::fetch_daily_bars")]
    async fn fetch_daily_bars(&self, symbol: &str, period: Period) -> Result<Vec<PriceBar>> {
        let url = self.chart_url(symbol, period)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read chart response body")?;

        if !status.is_success() {
            anyhow::bail!("Yahoo GET /v8/finance/chart/{} returned {}: {}", symbol, status, body);
        }

        let bars = parse_chart_response(&body)?;
        debug!(symbol, period = %period, count = bars.len(), "daily bars fetched");
        Ok(bars)
    }
}

impl std::fmt::Debug for YahooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
    #[serde(default)]
    adjclose: Vec<AdjCloseColumn>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct AdjCloseColumn {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn at(column: &[Option<f64>], idx: usize) -> Option<f64> {
    column.get(idx).copied().flatten()
}

/// Turn a chart API body into dividend/split-adjusted daily bars.
///
/// Rows with any missing OHLC value are skipped; a missing volume reads as 0.
/// When an adjusted close is present every price is scaled by
/// `adjclose / close`.
fn parse_chart_response(body: &str) -> Result<Vec<PriceBar>> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).context("failed to parse chart response")?;

    if let Some(err) = envelope.chart.error {
        anyhow::bail!("Yahoo chart error {}: {}", err.code, err.description);
    }

    let result = match envelope.chart.result.and_then(|r| r.into_iter().next()) {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .unwrap_or_default()
        .adjclose;
    let offset = result.meta.gmtoffset;

    let mut bars = Vec::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;

    for (i, &ts) in result.timestamp.iter().enumerate() {
        let (open, high, low, close) = match (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let date = DateTime::from_timestamp(ts + offset, 0)
            .with_context(|| format!("timestamp {ts} out of range"))?
            .date_naive();

        let volume = at(&quote.volume, i).map_or(0, |v| v.max(0.0) as u64);

        let bar = match at(&adjclose, i) {
            Some(adj) if close > 0.0 => {
                let factor = adj / close;
                PriceBar::new(date, open * factor, high * factor, low * factor, adj, volume)
            }
            _ => PriceBar::new(date, open, high, low, close, volume),
        };
        bars.push(bar);
    }

    if skipped > 0 {
        warn!(skipped, "skipping chart rows with missing OHLC values");
    }

    Ok(bars)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
