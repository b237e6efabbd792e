//! MACD crossover detection on the most recent candle.
//!
//! Bullish: MACD line moves from at-or-below the signal line on the previous
//! candle to strictly above it on the latest candle. Bearish is the mirror.
//! Anything that prevents evaluating both candles (short history, invalid
//! config, NaN input) reads as "no crossover".

use crate::config::MacdConfig;
use crate::domain::Candle;
use crate::indicators::macd::{Macd, MacdValue};

/// MACD values on the previous and latest candle.
fn last_two(candles: &[Candle], config: &MacdConfig) -> Option<(MacdValue, MacdValue)> {
    let macd = Macd::new(*config);
    macd.validate().ok()?;
    if candles.len() < config.crossover_lookback() {
        return None;
    }
    let series = macd.series(candles);
    let last = candles.len() - 1;
    Some((series.at(last - 1)?, series.at(last)?))
}

pub fn is_bullish_crossover(candles: &[Candle], config: &MacdConfig) -> bool {
    match last_two(candles, config) {
        Some((prev, curr)) => prev.macd <= prev.signal && curr.macd > curr.signal,
        None => false,
    }
}

pub fn is_bearish_crossover(candles: &[Candle], config: &MacdConfig) -> bool {
    match last_two(candles, config) {
        Some((prev, curr)) => prev.macd >= prev.signal && curr.macd < curr.signal,
        None => false,
    }
}
