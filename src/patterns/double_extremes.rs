// =============================================================================
// Double Top / Double Bottom Detector
// =============================================================================
//
// For each centre index i in [window, len - window):
//
//   Double Top (bearish)
//     top1 = max(high) over [i - window, i),  top2 = max(high) over [i, i + window)
//     |top1 - top2| / top1 < 2%  AND  close[i] < 0.98 * min(top1, top2)
//
//   Double Bottom (bullish)
//     bottom1 = min(low) over [i - window, i),  bottom2 = min(low) over [i, i + window)
//     |bottom1 - bottom2| / bottom1 < 2%  AND  close[i] > 1.02 * max(bottom1, bottom2)
//
// The top check runs first at each index; the first hit of either kind ends
// the scan, so a call never reports both.

use tracing::debug;

use super::{max_high, min_low, PatternKind, PatternMatch};
use crate::market_data::PriceBar;
use crate::types::PatternDirection;

/// Default look-back / look-ahead span, in bars.
pub const DEFAULT_WINDOW: usize = 30;

/// Maximum relative gap between the two extremes.
const TWIN_TOLERANCE: f64 = 0.02;

/// Close must sit at least 2% below both tops ...
const BREAKDOWN_FACTOR: f64 = 0.98;
/// ... or at least 2% above both bottoms.
const BREAKOUT_FACTOR: f64 = 1.02;

/// Stateless double top / double bottom scanner.
#[derive(Debug, Clone, Copy)]
pub struct DoubleExtremesDetector {
    window: usize,
}

impl Default for DoubleExtremesDetector {
    fn default() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }
}

impl DoubleExtremesDetector {
    pub fn with_window(window: usize) -> Self {
        Self { window }
    }

    /// Scan forward and return the first double top or double bottom.
    pub fn detect(&self, bars: &[PriceBar]) -> Option<PatternMatch> {
        let window = self.window;
        if window == 0 {
            return None;
        }

        for i in window..bars.len().saturating_sub(window) {
            let before = &bars[i - window..i];
            let after = &bars[i..i + window];
            let close = bars[i].close;

            let top1 = max_high(before);
            let top2 = max_high(after);
            if top1 > 0.0
                && (top1 - top2).abs() / top1 < TWIN_TOLERANCE
                && close < top1.min(top2) * BREAKDOWN_FACTOR
            {
                debug!(index = i, top1, top2, close, "double top detected");
                return Some(PatternMatch::new(
                    PatternKind::DoubleTop,
                    PatternDirection::Bearish,
                    i,
                ));
            }

            let bottom1 = min_low(before);
            let bottom2 = min_low(after);
            if bottom1 > 0.0
                && (bottom1 - bottom2).abs() / bottom1 < TWIN_TOLERANCE
                && close > bottom1.max(bottom2) * BREAKOUT_FACTOR
            {
                debug!(index = i, bottom1, bottom2, close, "double bottom detected");
                return Some(PatternMatch::new(
                    PatternKind::DoubleBottom,
                    PatternDirection::Bullish,
                    i,
                ));
            }
        }

        None
    }
}
