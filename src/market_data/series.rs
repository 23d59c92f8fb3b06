use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One daily OHLCV observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading-session date in the exchange's local calendar.
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Indicator columns aligned index-for-index with the bars of a
/// [`PriceSeries`].  `None` marks an index where the look-back is not yet
/// satisfied.  An un-enriched series carries empty columns, which read as
/// undefined everywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorColumns {
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub sma_20: Vec<Option<f64>>,
    pub ema_20: Vec<Option<f64>>,
    pub sma_50: Vec<Option<f64>>,
}

/// Snapshot of every indicator value at a single bar index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub sma_20: Option<f64>,
    pub ema_20: Option<f64>,
    pub sma_50: Option<f64>,
}

fn value_at(column: &[Option<f64>], idx: usize) -> Option<f64> {
    column.get(idx).copied().flatten()
}

impl IndicatorColumns {
    /// Read every column at `idx`.
    pub fn row(&self, idx: usize) -> IndicatorRow {
        IndicatorRow {
            rsi: value_at(&self.rsi, idx),
            macd: value_at(&self.macd, idx),
            macd_signal: value_at(&self.macd_signal, idx),
            macd_histogram: value_at(&self.macd_histogram, idx),
            sma_20: value_at(&self.sma_20, idx),
            ema_20: value_at(&self.ema_20, idx),
            sma_50: value_at(&self.sma_50, idx),
        }
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.rsi.is_empty()
            && self.macd.is_empty()
            && self.macd_signal.is_empty()
            && self.macd_histogram.is_empty()
            && self.sma_20.is_empty()
            && self.ema_20.is_empty()
            && self.sma_50.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PriceSeries
// ---------------------------------------------------------------------------

/// Date-ordered bars for one symbol plus, once enriched, aligned indicator
/// columns.
///
/// Bars are kept strictly increasing by date; construction sorts provider
/// rows and collapses duplicate dates (the later row wins).
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
    pub indicators: IndicatorColumns,
}

impl PriceSeries {
    pub fn from_bars(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        // Stable sort keeps provider order among equal dates, so the last
        // duplicate is the most recent row.
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: deduped,
            indicators: IndicatorColumns::default(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    #[cfg(test)]
    pub fn is_enriched(&self) -> bool {
        !self.indicators.is_empty()
    }

    /// Indicator snapshot at `idx`; all-`None` when out of range.
    pub fn row(&self, idx: usize) -> IndicatorRow {
        self.indicators.row(idx)
    }

    /// Indicator snapshot for the most recent bar.
    pub fn latest_row(&self) -> Option<IndicatorRow> {
        let idx = self.bars.len().checked_sub(1)?;
        Some(self.row(idx))
    }
}

/// Flattened bar + indicators, one per index, used for JSON output.
#[derive(Serialize)]
struct SeriesRow<'a> {
    #[serde(flatten)]
    bar: &'a PriceBar,
    #[serde(flatten)]
    indicators: IndicatorRow,
}

#[derive(Serialize)]
struct SeriesView<'a> {
    symbol: &'a str,
    rows: Vec<SeriesRow<'a>>,
}

impl Serialize for PriceSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows = self
            .bars
            .iter()
            .enumerate()
            .map(|(i, bar)| SeriesRow {
                bar,
                indicators: self.row(i),
            })
            .collect();
        SeriesView {
            symbol: &self.symbol,
            rows,
        }
        .serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn bar(d: u32, close: f64) -> PriceBar {
        PriceBar::new(day(d), close, close + 1.0, close - 1.0, close, 1_000)
    }

    #[test]
    fn from_bars_sorts_by_date() {
        let series = PriceSeries::from_bars("AAPL", vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)]);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_bars_collapses_duplicate_dates_keeping_latest() {
        let series = PriceSeries::from_bars("AAPL", vec![bar(1, 1.0), bar(2, 2.0), bar(2, 2.5)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.last().unwrap().close, 2.5);
    }

    #[test]
    fn unenriched_rows_are_undefined() {
        let series = PriceSeries::from_bars("AAPL", vec![bar(1, 1.0), bar(2, 2.0)]);
        assert!(!series.is_enriched());
        assert_eq!(series.latest_row(), Some(IndicatorRow::default()));
    }

    #[test]
    fn empty_series_has_no_latest_row() {
        let series = PriceSeries::from_bars("AAPL", Vec::new());
        assert!(series.is_empty());
        assert!(series.latest_row().is_none());
    }

    #[test]
    fn row_reads_aligned_columns() {
        let mut series = PriceSeries::from_bars("AAPL", vec![bar(1, 1.0), bar(2, 2.0)]);
        series.indicators.rsi = vec![None, Some(42.0)];
        assert_eq!(series.row(0).rsi, None);
        assert_eq!(series.row(1).rsi, Some(42.0));
        assert_eq!(series.row(7).rsi, None);
    }

    #[test]
    fn serialises_rows_with_null_indicators() {
        let mut series = PriceSeries::from_bars("AAPL", vec![bar(1, 1.0)]);
        series.indicators.sma_20 = vec![None];
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["rows"][0]["close"], 1.0);
        assert_eq!(json["rows"][0]["date"], "2024-03-01");
        assert!(json["rows"][0]["sma_20"].is_null());
    }
}
