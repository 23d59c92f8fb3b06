// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator math.  The `calculate_*` functions return
// only the defined values; the `*_column` variants align them to the input
// so every column indexes like the bars, with `None` for the warm-up region.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use tracing::debug;

use crate::error::AnalysisError;
use crate::market_data::{IndicatorColumns, PriceSeries};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const SHORT_MA_PERIOD: usize = 20;
pub const LONG_MA_PERIOD: usize = 50;

/// Return a copy of `series` with every indicator column recomputed from its
/// raw closes.
///
/// Existing indicator columns are ignored, so enriching twice yields the
/// same values.  Short series are not an error: columns whose window is not
/// satisfied stay `None` throughout.
pub fn enrich(series: &PriceSeries) -> Result<PriceSeries, AnalysisError> {
    if series.is_empty() {
        return Err(AnalysisError::InsufficientData);
    }

    let closes = series.closes();
    let macd = macd::calculate_macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);

    let mut enriched = series.clone();
    enriched.indicators = IndicatorColumns {
        rsi: rsi::rsi_column(&closes, RSI_PERIOD),
        macd: macd.line,
        macd_signal: macd.signal,
        macd_histogram: macd.histogram,
        sma_20: sma::sma_column(&closes, SHORT_MA_PERIOD),
        ema_20: ema::ema_column(&closes, SHORT_MA_PERIOD),
        sma_50: sma::sma_column(&closes, LONG_MA_PERIOD),
    };

    debug!(
        symbol = series.symbol(),
        bars = closes.len(),
        "indicator columns computed"
    );

    Ok(enriched)
}

/// Place `values` at `first..` in a column of length `len`, padding both ends
/// with `None`.
pub(crate) fn align(values: Vec<f64>, first: usize, len: usize) -> Vec<Option<f64>> {
    let mut column = vec![None; len];
    for (slot, v) in column.iter_mut().skip(first).zip(values) {
        *slot = Some(v);
    }
    column
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::PriceBar;
    use chrono::{Duration, NaiveDate};

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                PriceBar::new(start + Duration::days(i as i64), c, c + 1.0, c - 1.0, c, 1_000)
            })
            .collect();
        PriceSeries::from_bars("TEST", bars)
    }

    fn zigzag(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn enrich_empty_series_is_insufficient_data() {
        let err = enrich(&series_from_closes(&[])).unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData));
    }

    #[test]
    fn columns_match_bar_count_and_warm_up() {
        let series = enrich(&series_from_closes(&zigzag(70))).unwrap();
        let ind = &series.indicators;
        for col in [
            &ind.rsi,
            &ind.macd,
            &ind.macd_signal,
            &ind.macd_histogram,
            &ind.sma_20,
            &ind.ema_20,
            &ind.sma_50,
        ] {
            assert_eq!(col.len(), 70);
        }
        let first = |col: &Vec<Option<f64>>| col.iter().position(Option::is_some);
        assert_eq!(first(&ind.rsi), Some(13));
        assert_eq!(first(&ind.sma_20), Some(19));
        assert_eq!(first(&ind.ema_20), Some(19));
        assert_eq!(first(&ind.sma_50), Some(49));
        assert_eq!(first(&ind.macd), Some(25));
        assert_eq!(first(&ind.macd_signal), Some(33));
        assert_eq!(first(&ind.macd_histogram), Some(33));
    }

    #[test]
    fn short_series_enriches_with_undefined_columns() {
        let series = enrich(&series_from_closes(&[10.0, 11.0, 12.0])).unwrap();
        assert!(series.is_enriched());
        let row = series.latest_row().unwrap();
        assert!(row.rsi.is_none());
        assert!(row.macd.is_none());
        assert!(row.sma_50.is_none());
    }

    #[test]
    fn enrichment_is_idempotent() {
        let once = enrich(&series_from_closes(&zigzag(90))).unwrap();
        let twice = enrich(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn enrich_leaves_input_untouched() {
        let raw = series_from_closes(&zigzag(30));
        let _ = enrich(&raw).unwrap();
        assert!(!raw.is_enriched());
    }

    #[test]
    fn align_pads_and_truncates() {
        assert_eq!(align(vec![1.0, 2.0], 1, 4), vec![None, Some(1.0), Some(2.0), None]);
        assert_eq!(align(vec![1.0, 2.0], 3, 4), vec![None, None, None, Some(1.0)]);
        assert_eq!(align(Vec::new(), 5, 2), vec![None, None]);
    }
}
