// =============================================================================
// Relative Strength Index (RSI) — running-average form
// =============================================================================
//
// Gains and losses are smoothed with an exponential running average whose
// weight is 1 / period:
//
//   avg_t = (1 - 1/period) * avg_{t-1} + (1/period) * x_t
//
// The average starts at bar 0, where the change is taken as zero, so the
// first value is reported once `period` observations have been folded in
// (index `period - 1`).
//
//   RS  = avg_gain / avg_loss
//   RSI = 100 - 100 / (1 + RS),   or 100 when avg_loss is zero
// =============================================================================

use super::align;

/// Running gain / loss averages.
#[derive(Debug, Clone, Copy, Default)]
struct GainLossAverage {
    gain: f64,
    loss: f64,
}

impl GainLossAverage {
    fn update(&mut self, change: f64, alpha: f64) {
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };
        self.gain = (1.0 - alpha) * self.gain + alpha * gain;
        self.loss = (1.0 - alpha) * self.loss + alpha * loss;
    }

    /// RSI in [0, 100]; `None` when the averages are no longer finite.
    fn rsi(&self) -> Option<f64> {
        let rsi = if self.loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + self.gain / self.loss)
        };
        rsi.is_finite().then_some(rsi)
    }
}

/// Compute the RSI series for `closes`, one value per close starting at index
/// `period - 1`.
///
/// Returns an empty `Vec` when `period == 0` or fewer than `period` closes are
/// given.  A non-finite value ends the series there.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let alpha = 1.0 / period as f64;
    let mut avg = GainLossAverage::default();
    let mut result = Vec::with_capacity(closes.len() - period + 1);

    for i in 0..closes.len() {
        let change = if i == 0 { 0.0 } else { closes[i] - closes[i - 1] };
        avg.update(change, alpha);

        if i + 1 < period {
            continue;
        }
        match avg.rsi() {
            Some(rsi) => result.push(rsi),
            None => break,
        }
    }

    result
}

/// RSI aligned index-for-index with `closes`; undefined before `period - 1`.
pub fn rsi_column(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    align(calculate_rsi(closes, period), period.saturating_sub(1), closes.len())
}
