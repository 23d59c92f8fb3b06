// =============================================================================
// Head-and-Shoulders Detector — bearish reversal
// =============================================================================
//
// For each centre index i in [window, len - window) the span
// [i - window, i + window) is cut into three consecutive ranges:
//
//   left shoulder = max(high) over [i - window,   i - window/2)
//   head          = max(high) over [i - window/2, i + window/2)
//   right shoulder= max(high) over [i + window/2, i + window)
//
// A match needs the head strictly above both shoulders and the shoulders
// within 5% of each other, measured against the head:
//
//   |left - right| / head < 0.05
//
// The ranges are disjoint: if the head range covered the shoulders, the head
// would be the maximum of both and could never sit strictly above them.

use tracing::debug;

use super::{max_high, PatternKind, PatternMatch};
use crate::market_data::PriceBar;
use crate::types::PatternDirection;

/// Default half-span of the scan window, in bars.
pub const DEFAULT_WINDOW: usize = 20;

/// Maximum shoulder mismatch relative to the head.
const SHOULDER_TOLERANCE: f64 = 0.05;

/// Stateless head-and-shoulders scanner.
#[derive(Debug, Clone, Copy)]
pub struct HeadAndShouldersDetector {
    window: usize,
}

impl Default for HeadAndShouldersDetector {
    fn default() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }
}

impl HeadAndShouldersDetector {
    pub fn with_window(window: usize) -> Self {
        Self { window }
    }

    /// Scan forward and return the first qualifying window, if any.
    ///
    /// Series shorter than `2 * window` never enter the loop and yield `None`.
    pub fn detect(&self, bars: &[PriceBar]) -> Option<PatternMatch> {
        let window = self.window;
        if window < 2 {
            return None;
        }
        let half = window / 2;

        for i in window..bars.len().saturating_sub(window) {
            let left = max_high(&bars[i - window..i - half]);
            let head = max_high(&bars[i - half..i + half]);
            let right = max_high(&bars[i + half..i + window]);

            if head <= 0.0 {
                continue;
            }

            if head > left && head > right && (left - right).abs() / head < SHOULDER_TOLERANCE {
                debug!(index = i, left, head, right, "head and shoulders detected");
                return Some(PatternMatch::new(
                    PatternKind::HeadAndShoulders,
                    PatternDirection::Bearish,
                    i,
                ));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::test_support::flat_bars;
    use crate::types::Confidence;

    fn classic_formation() -> Vec<PriceBar> {
        let mut bars = flat_bars(60);
        bars[12].high = 110.0; // left shoulder
        bars[25].high = 120.0; // head
        bars[38].high = 111.0; // right shoulder
        bars
    }

    #[test]
    fn detects_classic_formation() {
        let found = HeadAndShouldersDetector::default()
            .detect(&classic_formation())
            .expect("pattern expected");
        assert_eq!(found.kind, PatternKind::HeadAndShoulders);
        assert_eq!(found.direction, PatternDirection::Bearish);
        assert_eq!(found.confidence, Confidence::Medium);
        assert_eq!(found.description, "Reversal pattern indicating potential downtrend");
        // First centre whose left range reaches bar 12.
        assert_eq!(found.index, 23);
    }

    /// 41 bars: exactly one centre (i = 20) is scanned, with the left
    /// shoulder range [0, 10), head range [10, 30) and right range [30, 40).
    fn single_window(left: f64, head: f64, right: f64) -> Vec<PriceBar> {
        let mut bars = flat_bars(41);
        bars[5].high = left;
        bars[20].high = head;
        bars[35].high = right;
        bars
    }

    #[test]
    fn single_window_match() {
        let found = HeadAndShouldersDetector::default().detect(&single_window(110.0, 120.0, 111.0));
        assert_eq!(found.map(|m| m.index), Some(20));
    }

    #[test]
    fn uneven_shoulders_are_rejected() {
        // |110 - 104| / 120 is exactly 5%, which is not below the tolerance.
        let bars = single_window(110.0, 120.0, 104.0);
        assert!(HeadAndShouldersDetector::default().detect(&bars).is_none());
    }

    #[test]
    fn shoulder_above_head_is_rejected() {
        let bars = single_window(110.0, 109.0, 111.0);
        assert!(HeadAndShouldersDetector::default().detect(&bars).is_none());
    }

    #[test]
    fn flat_series_has_no_match() {
        assert!(HeadAndShouldersDetector::default().detect(&flat_bars(100)).is_none());
    }

    #[test]
    fn short_series_never_matches() {
        // 39 bars < 2 * 20: the scan loop never runs.
        let mut bars = flat_bars(39);
        bars[19].high = 150.0;
        assert!(HeadAndShouldersDetector::default().detect(&bars).is_none());
        assert!(HeadAndShouldersDetector::default().detect(&[]).is_none());
    }

    #[test]
    fn first_qualifying_window_wins() {
        let mut bars = flat_bars(120);
        for (offset, bumps) in [(0usize, [110.0, 120.0, 111.0]), (60, [210.0, 220.0, 211.0])] {
            bars[offset + 12].high = bumps[0];
            bars[offset + 25].high = bumps[1];
            bars[offset + 38].high = bumps[2];
        }
        let found = HeadAndShouldersDetector::default().detect(&bars).unwrap();
        assert!(found.index < 60);
    }

    #[test]
    fn custom_window_scales_scan() {
        let mut bars = flat_bars(20);
        bars[2].high = 105.0;
        bars[10].high = 112.0;
        bars[17].high = 106.0;
        let found = HeadAndShouldersDetector::with_window(8).detect(&bars);
        assert!(found.is_some());
    }
}
