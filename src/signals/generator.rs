// =============================================================================
// Signal Generator
// =============================================================================
//
// Three independent rules, evaluated in this order against the LATEST row:
//
//   1. RSI            < 30 => BUY (oversold), > 70 => SELL (overbought),
//                     else neutral.
//   2. MACD           line > signal => BUY, otherwise SELL.  Equality is
//                     classified bearish.
//   3. Moving averages close > SMA20 > SMA50 => uptrend (BUY),
//                     close < SMA20 < SMA50 => downtrend (SELL), else mixed.
//
// A rule whose inputs are undefined is skipped.  Thresholds are fixed.

use tracing::debug;

use super::{Signal, SignalSource};
use crate::market_data::PriceSeries;
use crate::types::SignalDirection;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

pub const INSUFFICIENT_DATA: &str = "Insufficient data for analysis";

/// Evaluate every rule against the most recent bar of `series`.
///
/// Fewer than two bars yields a single advisory signal.
pub fn generate(series: &PriceSeries) -> Vec<Signal> {
    if series.len() < 2 {
        return vec![Signal::advisory(INSUFFICIENT_DATA)];
    }

    let (Some(last), Some(row)) = (series.last(), series.latest_row()) else {
        return vec![Signal::advisory(INSUFFICIENT_DATA)];
    };

    let mut signals = Vec::with_capacity(3);
    signals.extend(row.rsi.map(rsi_signal));
    if let (Some(line), Some(signal)) = (row.macd, row.macd_signal) {
        signals.push(macd_signal(line, signal));
    }
    if let (Some(sma_20), Some(sma_50)) = (row.sma_20, row.sma_50) {
        signals.push(trend_signal(last.close, sma_20, sma_50));
    }

    debug!(
        symbol = series.symbol(),
        count = signals.len(),
        "signals generated"
    );
    signals
}

fn rsi_signal(rsi: f64) -> Signal {
    if rsi < RSI_OVERSOLD {
        Signal::new(
            SignalSource::Rsi,
            SignalDirection::Buy,
            "RSI indicates OVERSOLD - Potential BUY",
        )
    } else if rsi > RSI_OVERBOUGHT {
        Signal::new(
            SignalSource::Rsi,
            SignalDirection::Sell,
            "RSI indicates OVERBOUGHT - Potential SELL",
        )
    } else {
        Signal::new(SignalSource::Rsi, SignalDirection::Neutral, "RSI in NEUTRAL zone")
    }
}

fn macd_signal(line: f64, signal: f64) -> Signal {
    if line > signal {
        Signal::new(
            SignalSource::Macd,
            SignalDirection::Buy,
            "MACD Bullish Crossover - BUY Signal",
        )
    } else {
        Signal::new(
            SignalSource::Macd,
            SignalDirection::Sell,
            "MACD Bearish Crossover - SELL Signal",
        )
    }
}

fn trend_signal(close: f64, sma_20: f64, sma_50: f64) -> Signal {
    if close > sma_20 && sma_20 > sma_50 {
        Signal::new(
            SignalSource::MovingAverage,
            SignalDirection::Buy,
            "Price above SMAs - Uptrend confirmed",
        )
    } else if close < sma_20 && sma_20 < sma_50 {
        Signal::new(
            SignalSource::MovingAverage,
            SignalDirection::Sell,
            "Price below SMAs - Downtrend confirmed",
        )
    } else {
        Signal::new(
            SignalSource::MovingAverage,
            SignalDirection::Neutral,
            "Mixed signals from Moving Averages",
        )
    }
}
