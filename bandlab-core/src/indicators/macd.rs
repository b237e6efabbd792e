//! MACD (Moving Average Convergence Divergence).
//!
//! MACD line = EMA(close, fast) - EMA(close, slow)
//! Signal    = EMA(MACD line, signal)
//! Histogram = MACD line - Signal
//!
//! Lookback: slow - 1 + signal - 1 (first bar with a defined signal line).

use serde::{Deserialize, Serialize};

use crate::config::MacdConfig;
use crate::domain::Candle;
use crate::error::IndicatorError;
use crate::indicators::ema::{ema_of_series, ema_of_tail};

use super::{ensure_history, Indicator};

/// MACD value at one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD line and signal line, aligned index-for-index with the input closes.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

impl MacdSeries {
    /// The MACD value at `index`, if both lines are defined there.
    pub fn at(&self, index: usize) -> Option<MacdValue> {
        let macd = *self.macd.get(index)?;
        let signal = *self.signal.get(index)?;
        if macd.is_nan() || signal.is_nan() {
            return None;
        }
        Some(MacdValue {
            macd,
            signal,
            histogram: macd - signal,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Macd {
    config: MacdConfig,
    name: String,
}

impl Macd {
    pub fn new(config: MacdConfig) -> Self {
        Self {
            config,
            name: format!(
                "macd_{}_{}_{}",
                config.fast_period, config.slow_period, config.signal_period
            ),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), IndicatorError> {
        let c = &self.config;
        if c.fast_period == 0 || c.slow_period == 0 || c.signal_period == 0 {
            return Err(IndicatorError::invalid("macd", "periods must be >= 1"));
        }
        if c.fast_period >= c.slow_period {
            return Err(IndicatorError::invalid(
                "macd",
                format!(
                    "fast_period ({}) must be below slow_period ({})",
                    c.fast_period, c.slow_period
                ),
            ));
        }
        Ok(())
    }

    /// Compute both MACD lines over the whole close series.
    pub fn series(&self, candles: &[Candle]) -> MacdSeries {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let fast = ema_of_series(&closes, self.config.fast_period);
        let slow = ema_of_series(&closes, self.config.slow_period);

        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_of_tail(&macd, self.config.signal_period);

        MacdSeries { macd, signal }
    }
}

impl Indicator for Macd {
    type Output = MacdValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        (self.config.slow_period + self.config.signal_period).saturating_sub(2)
    }

    fn latest(&self, candles: &[Candle]) -> Result<MacdValue, IndicatorError> {
        self.validate()?;
        ensure_history(candles.len(), self.lookback() + 1)?;

        self.series(candles)
            .at(candles.len() - 1)
            .ok_or_else(|| IndicatorError::NonFinite {
                indicator: self.name.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON};

    fn small() -> Macd {
        Macd::new(MacdConfig {
            fast_period: 2,
            slow_period: 3,
            signal_period: 2,
        })
    }

    #[test]
    fn macd_known_values() {
        // closes 1..=5, fast EMA(2) alpha 2/3, slow EMA(3) alpha 1/2
        // fast: [-, 1.5, 2.5, 3.5, 4.5]; slow: [-, -, 2, 3, 4]
        // macd: [-, -, 0.5, 0.5, 0.5]; signal EMA(2): [-, -, -, 0.5, 0.5]
        let candles = make_candles(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let value = small().latest(&candles).unwrap();
        assert_approx(value.macd, 0.5, DEFAULT_EPSILON);
        assert_approx(value.signal, 0.5, DEFAULT_EPSILON);
        assert_approx(value.histogram, 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn macd_series_alignment() {
        let candles = make_candles(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let series = small().series(&candles);
        assert_eq!(series.macd.len(), 5);
        assert!(series.at(2).is_none()); // macd defined, signal not yet
        assert!(series.at(3).is_some());
    }

    #[test]
    fn macd_lookback_standard() {
        // 26 - 1 + 9 - 1 = 33 → first defined value needs 34 candles
        assert_eq!(Macd::new(MacdConfig::STANDARD).lookback(), 33);
    }

    #[test]
    fn macd_insufficient_data() {
        let candles = make_candles(&[1.0; 33]);
        let err = Macd::new(MacdConfig::STANDARD).latest(&candles).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn macd_rejects_fast_not_below_slow() {
        let macd = Macd::new(MacdConfig {
            fast_period: 26,
            slow_period: 12,
            signal_period: 9,
        });
        let err = macd.latest(&make_candles(&[1.0; 40])).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter { .. }));
    }

    #[test]
    fn macd_rising_series_is_positive() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
        let value = Macd::new(MacdConfig::STANDARD)
            .latest(&make_candles(&closes))
            .unwrap();
        assert!(value.macd > 0.0);
    }
}
