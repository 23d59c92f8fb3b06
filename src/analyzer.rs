// =============================================================================
// Pattern Analyzer — fetch → enrich → detect → signals
// =============================================================================
//
// One call performs a single provider read and is otherwise pure.  Any fetch
// problem (provider error, no rows, blank symbol) collapses into a report
// with no series, no patterns and one advisory signal; it is never returned
// as an error.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::AnalysisError;
use crate::indicators::enrich;
use crate::market_data::{DataProvider, PriceSeries};
use crate::patterns::detect_all;
use crate::report::{AnalysisReport, MarketSummary};
use crate::signals::{generate, Signal};
use crate::types::Period;

pub const FETCH_FAILED: &str = "Failed to fetch data for this symbol";

/// Ticker symbols are matched case-insensitively by the provider; we always
/// send them trimmed and upper-cased.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

pub struct PatternAnalyzer {
    provider: Arc<dyn DataProvider>,
}

impl PatternAnalyzer {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        Self { provider }
    }

    /// Run a full analysis for `symbol` over `period`.
    pub async fn analyze(&self, symbol: &str, period: Period) -> AnalysisReport {
        let symbol = normalize_symbol(symbol);

        let raw = match self.fetch(&symbol, period).await {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol = %symbol, period = %period, error = %e, "analysis aborted");
                return Self::fetch_failed(symbol, period);
            }
        };

        let series = match enrich(&raw) {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "indicator enrichment failed");
                return Self::fetch_failed(symbol, period);
            }
        };

        let patterns = detect_all(series.bars());
        let signals = generate(&series);
        let summary = MarketSummary::from_series(&series);

        info!(
            symbol = %symbol,
            period = %period,
            bars = series.len(),
            patterns = patterns.len(),
            signals = signals.len(),
            "analysis complete"
        );

        AnalysisReport::new(symbol, period, Some(series), patterns, signals, summary)
    }

    async fn fetch(&self, symbol: &str, period: Period) -> Result<PriceSeries, AnalysisError> {
        if symbol.is_empty() {
            return Err(AnalysisError::FetchFailure("empty symbol".to_string()));
        }

        let bars = self
            .provider
            .fetch_daily_bars(symbol, period)
            .await
            .map_err(|e| AnalysisError::FetchFailure(format!("{e:#}")))?;

        if bars.is_empty() {
            return Err(AnalysisError::FetchFailure(format!(
                "provider returned no bars for {symbol}"
            )));
        }

        Ok(PriceSeries::from_bars(symbol, bars))
    }

    fn fetch_failed(symbol: String, period: Period) -> AnalysisReport {
        AnalysisReport::new(
            symbol,
            period,
            None,
            Vec::new(),
            vec![Signal::advisory(FETCH_FAILED)],
            None,
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::market_data::PriceBar;
    use crate::patterns::PatternKind;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use parking_lot::Mutex;

    /// In-memory provider that records the symbols it was asked for.
    pub(crate) struct StubProvider {
        bars: Option<Vec<PriceBar>>,
        pub requests: Mutex<Vec<(String, Period)>>,
    }

    impl StubProvider {
        pub(crate) fn with_bars(bars: Vec<PriceBar>) -> Self {
            Self {
                bars: Some(bars),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                bars: None,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DataProvider for StubProvider {
        async fn fetch_daily_bars(&self, symbol: &str, period: Period) -> Result<Vec<PriceBar>> {
            self.requests.lock().push((symbol.to_string(), period));
            match &self.bars {
                Some(bars) => Ok(bars.clone()),
                None => anyhow::bail!("connection refused"),
            }
        }
    }

    pub(crate) fn double_top_bars() -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut bars: Vec<PriceBar> = (0..61)
            .map(|i| {
                PriceBar::new(start + Duration::days(i), 99.5, 100.0, 99.0, 99.5, 1_000 + i as u64)
            })
            .collect();
        bars[15].high = 110.0;
        bars[45].high = 110.5;
        bars
    }

    fn assert_fetch_failed(report: &AnalysisReport) {
        assert!(report.series.is_none());
        assert!(report.patterns.is_empty());
        assert!(report.summary.is_none());
        assert_eq!(report.signals.len(), 1);
        assert!(report.signals[0].is_advisory());
        assert_eq!(report.signals[0].message, FETCH_FAILED);
    }

    #[tokio::test]
    async fn provider_error_collapses_to_advisory() {
        let analyzer = PatternAnalyzer::new(Arc::new(StubProvider::failing()));
        let report = analyzer.analyze("NOPE", Period::OneYear).await;
        assert_fetch_failed(&report);
    }

    #[tokio::test]
    async fn empty_provider_response_collapses_to_advisory() {
        let analyzer = PatternAnalyzer::new(Arc::new(StubProvider::with_bars(Vec::new())));
        let report = analyzer.analyze("DELISTED", Period::OneMonth).await;
        assert_fetch_failed(&report);
    }

    #[tokio::test]
    async fn blank_symbol_never_reaches_provider() {
        let provider = Arc::new(StubProvider::with_bars(double_top_bars()));
        let analyzer = PatternAnalyzer::new(provider.clone());
        let report = analyzer.analyze("   ", Period::SixMonths).await;
        assert_fetch_failed(&report);
        assert!(provider.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn symbol_is_normalised_before_fetch() {
        let provider = Arc::new(StubProvider::with_bars(double_top_bars()));
        let analyzer = PatternAnalyzer::new(provider.clone());
        let report = analyzer.analyze("  tcs.ns ", Period::ThreeMonths).await;
        assert_eq!(report.symbol, "TCS.NS");
        assert_eq!(
            provider.requests.lock().as_slice(),
            &[("TCS.NS".to_string(), Period::ThreeMonths)]
        );
    }

    #[tokio::test]
    async fn full_pipeline_produces_series_patterns_and_signals() {
        let analyzer = PatternAnalyzer::new(Arc::new(StubProvider::with_bars(double_top_bars())));
        let report = analyzer.analyze("ACME", Period::OneYear).await;

        let series = report.series.as_ref().expect("series expected");
        assert_eq!(series.len(), 61);
        assert!(series.is_enriched());

        // The isolated first peak also reads as a head over flat shoulders.
        let kinds: Vec<_> = report.patterns.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PatternKind::HeadAndShoulders, PatternKind::DoubleTop]);

        // 61 bars: RSI, MACD and both SMAs are defined at the last bar.
        assert_eq!(report.signals.len(), 3);
        assert!(report.signals.iter().all(|s| !s.is_advisory()));

        let summary = report.summary.expect("summary expected");
        assert_eq!(summary.latest_volume, 1_060);
    }

    #[test]
    fn normalize_symbol_trims_and_uppercases() {
        assert_eq!(normalize_symbol(" reliance.ns\n"), "RELIANCE.NS");
    }
}
