//! SuperTrend — ATR-based directional indicator.
//!
//! Inherently sequential: direction flips between support and resistance
//! based on close vs band comparisons.
//!
//! Lookback: period (same as ATR lookback since it depends on ATR).
//!
//! Output: the active band value (lower band when trending up, upper band when
//! trending down) together with the trend direction.

use serde::{Deserialize, Serialize};

use crate::config::SupertrendConfig;
use crate::domain::Candle;
use crate::error::IndicatorError;
use crate::indicators::atr::{candle_true_range, wilder_smooth};

use super::{ensure_history, Indicator};

/// SuperTrend direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SuperTrend value at one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupertrendValue {
    pub value: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone)]
pub struct Supertrend {
    period: usize,
    multiplier: f64,
    name: String,
}

impl Supertrend {
    pub fn new(config: SupertrendConfig) -> Self {
        Self {
            period: config.period,
            multiplier: config.multiplier,
            name: format!("supertrend_{}_{}", config.period, config.multiplier),
        }
    }

    /// Full SuperTrend series; `None` during warm-up or on invalid bars.
    pub fn series(&self, candles: &[Candle]) -> Vec<Option<SupertrendValue>> {
        let n = candles.len();
        let mut result = vec![None; n];

        let tr = candle_true_range(candles);
        let atr = wilder_smooth(&tr, self.period);

        let start = match atr.iter().position(|v| !v.is_nan()) {
            Some(idx) => idx,
            None => return result,
        };

        let hl2 = (candles[start].high + candles[start].low) / 2.0;
        let mut upper_band = hl2 + self.multiplier * atr[start];
        let mut lower_band = hl2 - self.multiplier * atr[start];
        // Start trending up (support)
        let mut trending_up = true;
        result[start] = Some(SupertrendValue {
            value: lower_band,
            trend: Trend::Up,
        });

        for i in (start + 1)..n {
            let candle = &candles[i];
            if atr[i].is_nan() || candle.is_void() {
                continue;
            }

            let hl2 = (candle.high + candle.low) / 2.0;
            let basic_upper = hl2 + self.multiplier * atr[i];
            let basic_lower = hl2 - self.multiplier * atr[i];

            // Upper band can only decrease (tighten resistance)
            let prev_close = candles[i - 1].close;
            let new_upper = if !prev_close.is_nan() && prev_close <= upper_band {
                basic_upper.min(upper_band)
            } else {
                basic_upper
            };

            // Lower band can only increase (tighten support)
            let new_lower = if !prev_close.is_nan() && prev_close >= lower_band {
                basic_lower.max(lower_band)
            } else {
                basic_lower
            };

            upper_band = new_upper;
            lower_band = new_lower;

            if trending_up && candle.close < lower_band {
                trending_up = false;
            } else if !trending_up && candle.close > upper_band {
                trending_up = true;
            }

            result[i] = Some(if trending_up {
                SupertrendValue {
                    value: lower_band,
                    trend: Trend::Up,
                }
            } else {
                SupertrendValue {
                    value: upper_band,
                    trend: Trend::Down,
                }
            });
        }

        result
    }
}

impl Indicator for Supertrend {
    type Output = SupertrendValue;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn latest(&self, candles: &[Candle]) -> Result<SupertrendValue, IndicatorError> {
        if self.period == 0 {
            return Err(IndicatorError::invalid("supertrend", "period must be >= 1"));
        }
        if !(self.multiplier.is_finite() && self.multiplier > 0.0) {
            return Err(IndicatorError::invalid(
                "supertrend",
                format!("multiplier must be positive, got {}", self.multiplier),
            ));
        }
        ensure_history(candles.len(), self.lookback() + 1)?;

        match self.series(candles).last().copied().flatten() {
            Some(point) if point.value.is_finite() => Ok(point),
            _ => Err(IndicatorError::NonFinite {
                indicator: self.name.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_ohlc_candles;

    fn supertrend(period: usize, multiplier: f64) -> Supertrend {
        Supertrend::new(SupertrendConfig { period, multiplier })
    }

    fn uptrend() -> Vec<Candle> {
        let data: Vec<_> = (0..15)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                (base - 1.0, base + 3.0, base - 3.0, base + 1.0)
            })
            .collect();
        make_ohlc_candles(&data)
    }

    fn downtrend() -> Vec<Candle> {
        let data: Vec<_> = (0..15)
            .map(|i| {
                let base = 200.0 - i as f64 * 3.0;
                (base + 1.0, base + 3.0, base - 3.0, base - 1.0)
            })
            .collect();
        make_ohlc_candles(&data)
    }

    #[test]
    fn supertrend_uptrend_below_price() {
        let candles = uptrend();
        let series = supertrend(3, 2.0).series(&candles);
        for (i, point) in series.iter().enumerate().skip(5) {
            let point = point.expect("defined after warm-up");
            assert_eq!(point.trend, Trend::Up, "bar {i}");
            assert!(
                point.value < candles[i].close,
                "supertrend ({}) should be below close ({}) at bar {i} in uptrend",
                point.value,
                candles[i].close
            );
        }
    }

    #[test]
    fn supertrend_downtrend_flips_down() {
        let candles = downtrend();
        let latest = supertrend(3, 2.0).latest(&candles).unwrap();
        assert_eq!(latest.trend, Trend::Down);
        assert!(latest.value > candles.last().unwrap().close);
    }

    #[test]
    fn supertrend_lookback() {
        assert_eq!(supertrend(14, 3.0).lookback(), 14);
    }

    #[test]
    fn supertrend_too_few_candles() {
        let candles = make_ohlc_candles(&[(100.0, 105.0, 95.0, 102.0)]);
        assert!(supertrend(3, 2.0).series(&candles).iter().all(Option::is_none));
        assert!(supertrend(3, 2.0)
            .latest(&candles)
            .unwrap_err()
            .is_insufficient_data());
    }

    #[test]
    fn trend_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Trend::Down).unwrap(), "\"down\"");
    }
}
