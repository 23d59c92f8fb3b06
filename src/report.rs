// =============================================================================
// Analysis Report — the bundle handed to every presentation surface
// =============================================================================

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::market_data::PriceSeries;
use crate::patterns::PatternMatch;
use crate::signals::Signal;
use crate::types::{Period, SignalDirection};

/// Headline metrics for the analysed range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub current_price: f64,
    /// Last close minus first close.
    pub price_change: f64,
    pub percent_change: f64,
    pub latest_volume: u64,
    /// "₹" for exchange-suffixed tickers such as `TCS.NS`, "$" otherwise.
    pub currency: &'static str,
}

impl MarketSummary {
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;

        let price_change = last.close - first.close;
        let percent_change = if first.close.abs() > f64::EPSILON {
            price_change / first.close * 100.0
        } else {
            0.0
        };
        let currency = if series.symbol().contains('.') { "₹" } else { "$" };

        Some(Self {
            current_price: last.close,
            price_change,
            percent_change,
            latest_volume: last.volume,
            currency,
        })
    }
}

/// Everything one analysis produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub period: Period,
    pub generated_at: DateTime<Utc>,
    pub summary: Option<MarketSummary>,
    pub patterns: Vec<PatternMatch>,
    pub signals: Vec<Signal>,
    /// `None` when the provider could not supply data.
    pub series: Option<PriceSeries>,
}

impl AnalysisReport {
    pub fn new(
        symbol: String,
        period: Period,
        series: Option<PriceSeries>,
        patterns: Vec<PatternMatch>,
        signals: Vec<Signal>,
        summary: Option<MarketSummary>,
    ) -> Self {
        Self {
            symbol,
            period,
            generated_at: Utc::now(),
            summary,
            patterns,
            signals,
            series,
        }
    }

    pub fn digest(&self) -> ReportDigest {
        ReportDigest {
            symbol: self.symbol.clone(),
            period: self.period,
            fetched: self.series.is_some(),
            patterns: self.patterns.iter().map(|p| p.kind.to_string()).collect(),
            signal_count: self.signals.iter().filter(|s| !s.is_advisory()).count(),
            generated_at: self.generated_at,
        }
    }
}

/// Compact record kept in the server's recent-analyses ring.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDigest {
    pub symbol: String,
    pub period: Period,
    pub fetched: bool,
    pub patterns: Vec<String>,
    /// Trading signals only; advisories are not counted.
    pub signal_count: usize,
    pub generated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Plain-text rendering
// ---------------------------------------------------------------------------

/// Render `report` for a terminal.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Stock Analysis: {} ({})", report.symbol, report.period);
    let _ = writeln!(out, "{}", "-".repeat(60));

    if report.series.is_none() {
        let _ = writeln!(
            out,
            "Could not fetch data for '{}'. Please check the symbol.",
            report.symbol
        );
    }

    if let Some(s) = &report.summary {
        let _ = writeln!(out, "Current Price     : {}{:.2}", s.currency, s.current_price);
        let _ = writeln!(out, "Price Change      : {}{:.2}", s.currency, s.price_change);
        let _ = writeln!(out, "Percentage Change : {:+.2}%", s.percent_change);
        let _ = writeln!(out, "Volume            : {}", group_thousands(s.latest_volume));
        let _ = writeln!(out);
    }

    if report.series.is_some() {
        let _ = writeln!(out, "Detected Chart Patterns");
        if report.patterns.is_empty() {
            let _ = writeln!(
                out,
                "  No strong chart patterns detected in the selected timeframe."
            );
        }
        for p in &report.patterns {
            let _ = writeln!(out, "  * {} ({})", p.kind, p.direction);
            let _ = writeln!(out, "    Confidence : {}", p.confidence);
            let _ = writeln!(out, "    Description: {}", p.description);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Trading Signals");
    for s in &report.signals {
        let tag = match s.direction {
            SignalDirection::Buy => "[BUY] ",
            SignalDirection::Sell => "[SELL]",
            SignalDirection::Neutral => "[INFO]",
        };
        let _ = writeln!(out, "  {tag} {}", s.message);
    }

    out
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
