// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_t = (close_{t-n+1} + ... + close_t) / n
//
// Computed with a running sum; defined from index `period - 1`.
// =============================================================================

use super::align;

/// Compute the SMA series for `closes`, one value per close starting at index
/// `period - 1`.
///
/// Returns an empty `Vec` when `period == 0` or the input is shorter than
/// `period`.  A non-finite window mean ends the series there.
pub fn calculate_sma(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;
    let mut sum: f64 = closes[..period].iter().sum();
    let mut result = Vec::with_capacity(closes.len() - period + 1);

    for i in period - 1..closes.len() {
        if i >= period {
            sum += closes[i] - closes[i - period];
        }
        let mean = sum / period_f;
        if !mean.is_finite() {
            break;
        }
        result.push(mean);
    }

    result
}

/// SMA aligned index-for-index with `closes`.
pub fn sma_column(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    align(calculate_sma(closes, period), period.saturating_sub(1), closes.len())
}
