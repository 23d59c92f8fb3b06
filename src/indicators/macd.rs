// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   line      = EMA(fast) - EMA(slow)
//   signal    = EMA(signal_period) of the MACD line
//   histogram = line - signal
//
// With the classic 12/26/9 parameters the line is defined from index 25 and
// the signal / histogram from index 33.
// =============================================================================

use super::ema::{calculate_ema, ema_column};
use super::align;

/// Aligned MACD columns, each the same length as the input closes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdColumns {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// Compute MACD line, signal and histogram for `closes`.
///
/// Undefined indices are `None`.  The signal EMA runs over the contiguous run
/// of defined line values, so a break in the line also ends the signal.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdColumns {
    let len = closes.len();
    let fast_col = ema_column(closes, fast);
    let slow_col = ema_column(closes, slow);

    let line: Vec<Option<f64>> = fast_col
        .iter()
        .zip(&slow_col)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let Some(start) = line.iter().position(Option::is_some) else {
        return MacdColumns {
            line,
            signal: vec![None; len],
            histogram: vec![None; len],
        };
    };

    let defined: Vec<f64> = line[start..].iter().map_while(|v| *v).collect();
    let signal_col = align(
        calculate_ema(&defined, signal),
        start + signal.saturating_sub(1),
        len,
    );

    let histogram = line
        .iter()
        .zip(&signal_col)
        .map(|(l, s)| match (l, s) {
            (Some(l), Some(s)) => Some(l - s),
            _ => None,
        })
        .collect();

    MacdColumns {
        line,
        signal: signal_col,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 / 5.0).sin() * 10.0).collect()
    }

    #[test]
    fn macd_first_defined_indices() {
        let cols = calculate_macd(&wave(60), 12, 26, 9);
        assert_eq!(cols.line.len(), 60);
        assert!(cols.line[24].is_none());
        assert!(cols.line[25].is_some());
        assert!(cols.signal[32].is_none());
        assert!(cols.signal[33].is_some());
        assert!(cols.histogram[32].is_none());
        assert!(cols.histogram[33].is_some());
    }

    #[test]
    fn histogram_is_line_minus_signal() {
        let cols = calculate_macd(&wave(80), 12, 26, 9);
        for i in 33..80 {
            let (l, s, h) = (
                cols.line[i].unwrap(),
                cols.signal[i].unwrap(),
                cols.histogram[i].unwrap(),
            );
            assert!((l - s - h).abs() < 1e-10);
        }
    }

    #[test]
    fn flat_series_has_zero_macd() {
        let cols = calculate_macd(&[50.0; 40], 12, 26, 9);
        assert!(cols.line[25..].iter().all(|v| v.unwrap().abs() < 1e-10));
        assert!(cols.signal[33..].iter().all(|v| v.unwrap().abs() < 1e-10));
    }

    #[test]
    fn short_series_is_undefined() {
        let cols = calculate_macd(&wave(20), 12, 26, 9);
        assert!(cols.line.iter().all(Option::is_none));
        assert_eq!(cols.signal, vec![None; 20]);
        assert_eq!(cols.histogram, vec![None; 20]);
    }
}
