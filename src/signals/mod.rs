// =============================================================================
// Signals Module
// =============================================================================
//
// Rule-based trading signals derived from the latest indicator row:
// - RSI overbought / oversold zones
// - MACD line vs. signal crossover
// - Close / SMA-20 / SMA-50 trend stack

pub mod generator;

use serde::{Deserialize, Serialize};

use crate::types::SignalDirection;

pub use generator::generate;

/// Which rule produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalSource {
    Rsi,
    Macd,
    MovingAverage,
    /// Not a trading signal; explains why analysis could not run.
    Advisory,
}

/// A single trading signal.  `direction` is decided when the rule fires;
/// `message` is display text only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub source: SignalSource,
    pub direction: SignalDirection,
    pub message: String,
}

impl Signal {
    pub fn new(source: SignalSource, direction: SignalDirection, message: impl Into<String>) -> Self {
        Self {
            source,
            direction,
            message: message.into(),
        }
    }

    pub fn advisory(message: impl Into<String>) -> Self {
        Self::new(SignalSource::Advisory, SignalDirection::Neutral, message)
    }

    pub fn is_advisory(&self) -> bool {
        self.source == SignalSource::Advisory
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
