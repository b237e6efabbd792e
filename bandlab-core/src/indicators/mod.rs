//! Indicator adapters.
//!
//! Each adapter takes an ordered candle window and returns the latest value of
//! its indicator, or `IndicatorError::InsufficientData` while the window is
//! still warming up. Adapters validate their own parameters and report bad ones
//! as `IndicatorError::InvalidParameter`.

pub mod atr;
pub mod bollinger;
pub mod cci;
pub mod crossover;
pub mod ema;
pub mod keltner;
pub mod macd;
pub mod supertrend;

pub use atr::{atr_series, Atr};
pub use bollinger::Bollinger;
pub use cci::Cci;
pub use crossover::{is_bearish_crossover, is_bullish_crossover};
pub use keltner::Keltner;
pub use macd::{Macd, MacdValue};
pub use supertrend::{Supertrend, SupertrendValue, Trend};

use serde::{Deserialize, Serialize};

use crate::domain::Candle;
use crate::error::IndicatorError;

/// Trait for indicator adapters.
///
/// # Look-ahead guard
/// The value returned for a window depends only on candles inside that window.
pub trait Indicator: Send + Sync {
    type Output;

    /// Human-readable name including parameters (e.g., "cci_20", "atr_14").
    fn name(&self) -> &str;

    /// Number of leading candles consumed before the first valid output.
    fn lookback(&self) -> usize;

    /// Value on the last candle of `candles`.
    fn latest(&self, candles: &[Candle]) -> Result<Self::Output, IndicatorError>;
}

/// Upper/middle/lower values of a channel indicator (Keltner, Bollinger).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub(crate) fn ensure_history(available: usize, needed: usize) -> Result<(), IndicatorError> {
    if available < needed {
        return Err(IndicatorError::InsufficientData { needed, available });
    }
    Ok(())
}

pub(crate) fn finite(indicator: &str, value: f64) -> Result<f64, IndicatorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IndicatorError::NonFinite {
            indicator: indicator.to_string(),
        })
    }
}

/// Last element of a computed series, which must be finite.
pub(crate) fn last_finite(indicator: &str, series: &[f64]) -> Result<f64, IndicatorError> {
    finite(indicator, series.last().copied().unwrap_or(f64::NAN))
}

/// Create synthetic candles from close prices for testing.
///
/// open = prev_close (or close for the first candle),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0,
/// 15-minute candles starting 2024-01-02T00:00Z.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    let data: Vec<(f64, f64, f64, f64)> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            (open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect();
    make_ohlc_candles(&data)
}

/// Create candles from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_candles(data: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| {
            let open_time = base + chrono::Duration::minutes(15 * i as i64);
            Candle {
                open_time,
                close_time: open_time + chrono::Duration::minutes(15),
                open,
                high,
                low,
                close,
            }
        })
        .collect()
}

/// Accelerating decline over 59 candles, then one +400 candle.
///
/// The last candle breaks above both channels with a bullish MACD crossover,
/// a strongly positive CCI, and a SuperTrend flip to up.
#[cfg(test)]
pub fn decline_then_jump() -> Vec<Candle> {
    let mut closes: Vec<f64> = (0..59)
        .map(|i| {
            let i = i as f64;
            3000.0 - 2.0 * i - 0.1 * i * i
        })
        .collect();
    let last = closes[closes.len() - 1];
    closes.push(last + 400.0);
    make_candles(&closes)
}

/// Mirror of [`decline_then_jump`]: accelerating rise, then one -400 candle.
#[cfg(test)]
pub fn rise_then_drop() -> Vec<Candle> {
    let mut closes: Vec<f64> = (0..59)
        .map(|i| {
            let i = i as f64;
            2000.0 + 2.0 * i + 0.1 * i * i
        })
        .collect();
    let last = closes[closes.len() - 1];
    closes.push(last - 400.0);
    make_candles(&closes)
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
