// =============================================================================
// Chart Pattern Detectors
// =============================================================================
//
// Geometric scanners over raw bars.  Detectors see `&[PriceBar]` only, never
// indicator columns.
//
// Scanning contract: each detector walks centre indices forward and stops at
// the FIRST qualifying window.  Later occurrences are shadowed and never
// reported, so one call yields at most one match per detector.

pub mod double_extremes;
pub mod head_shoulders;

use serde::{Deserialize, Serialize};

use crate::market_data::PriceBar;
use crate::types::{Confidence, PatternDirection};

pub use double_extremes::DoubleExtremesDetector;
pub use head_shoulders::HeadAndShouldersDetector;

pub(crate) const BEARISH_REVERSAL: &str = "Reversal pattern indicating potential downtrend";
pub(crate) const BULLISH_REVERSAL: &str = "Reversal pattern indicating potential uptrend";

/// Which classical pattern was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    HeadAndShoulders,
    DoubleTop,
    DoubleBottom,
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HeadAndShoulders => write!(f, "Head and Shoulders"),
            Self::DoubleTop => write!(f, "Double Top"),
            Self::DoubleBottom => write!(f, "Double Bottom"),
        }
    }
}

/// A detected chart pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub kind: PatternKind,
    pub direction: PatternDirection,
    pub confidence: Confidence,
    pub description: String,
    /// Centre index of the window that qualified.
    pub index: usize,
}

impl PatternMatch {
    pub(crate) fn new(kind: PatternKind, direction: PatternDirection, index: usize) -> Self {
        let description = match direction {
            PatternDirection::Bearish => BEARISH_REVERSAL,
            PatternDirection::Bullish => BULLISH_REVERSAL,
        };
        Self {
            kind,
            direction,
            confidence: Confidence::Medium,
            description: description.to_string(),
            index,
        }
    }
}

/// Run every detector with its default window: head-and-shoulders first,
/// then double top/bottom.
pub fn detect_all(bars: &[PriceBar]) -> Vec<PatternMatch> {
    let mut patterns = Vec::with_capacity(2);
    patterns.extend(HeadAndShouldersDetector::default().detect(bars));
    patterns.extend(DoubleExtremesDetector::default().detect(bars));
    patterns
}

/// Highest high across `bars`.
pub(crate) fn max_high(bars: &[PriceBar]) -> f64 {
    bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max)
}

/// Lowest low across `bars`.
pub(crate) fn min_low(bars: &[PriceBar]) -> f64 {
    bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, NaiveDate};

    use crate::market_data::PriceBar;

    /// `n` bars with high 100, low 99 and close 99.5.
    pub fn flat_bars(n: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        (0..n)
            .map(|i| PriceBar::new(start + Duration::days(i as i64), 99.5, 100.0, 99.0, 99.5, 500))
            .collect()
    }
}
