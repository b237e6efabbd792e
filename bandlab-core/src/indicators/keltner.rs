//! Keltner Channel — EMA +/- ATR multiple.
//!
//! - Middle: EMA(close, ma_period)
//! - Upper: middle + atr_multiple * ATR(atr_period)
//! - Lower: middle - atr_multiple * ATR(atr_period)
//!
//! Lookback: max(ma_period - 1, atr_period).

use crate::config::KeltnerConfig;
use crate::domain::Candle;
use crate::error::IndicatorError;
use crate::indicators::atr::{candle_true_range, wilder_smooth};
use crate::indicators::ema::ema_of_series;

use super::{ensure_history, last_finite, Bands, Indicator};

#[derive(Debug, Clone)]
pub struct Keltner {
    ma_period: usize,
    atr_period: usize,
    atr_multiple: f64,
    name: String,
}

impl Keltner {
    pub fn new(config: KeltnerConfig) -> Self {
        Self {
            ma_period: config.ma_period,
            atr_period: config.atr_period,
            atr_multiple: config.atr_multiple,
            name: format!(
                "keltner_{}_{}_{}",
                config.ma_period, config.atr_period, config.atr_multiple
            ),
        }
    }
}

impl Indicator for Keltner {
    type Output = Bands;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        (self.ma_period.saturating_sub(1)).max(self.atr_period)
    }

    fn latest(&self, candles: &[Candle]) -> Result<Bands, IndicatorError> {
        if self.ma_period == 0 || self.atr_period == 0 {
            return Err(IndicatorError::invalid("keltner", "periods must be >= 1"));
        }
        if !(self.atr_multiple.is_finite() && self.atr_multiple > 0.0) {
            return Err(IndicatorError::invalid(
                "keltner",
                format!("atr_multiple must be positive, got {}", self.atr_multiple),
            ));
        }
        ensure_history(candles.len(), self.lookback() + 1)?;

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let middle = last_finite(&self.name, &ema_of_series(&closes, self.ma_period))?;

        let tr = candle_true_range(candles);
        let atr = last_finite(&self.name, &wilder_smooth(&tr, self.atr_period))?;

        Ok(Bands {
            upper: middle + self.atr_multiple * atr,
            middle,
            lower: middle - self.atr_multiple * atr,
        })
    }
}
