//! Commodity Channel Index (CCI).
//!
//! TP  = (high + low + close) / 3
//! CCI = (TP - SMA(TP, period)) / (0.015 * mean absolute deviation of TP)
//!
//! A window with zero mean deviation (flat typical price) reads as 0.
//! Lookback: period - 1.

use crate::config::CciConfig;
use crate::domain::Candle;
use crate::error::IndicatorError;

use super::{ensure_history, finite, Indicator};

/// Lambert's constant: scales CCI so ~70-80% of values fall within ±100.
const CCI_CONSTANT: f64 = 0.015;

#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
    name: String,
}

impl Cci {
    pub fn new(config: CciConfig) -> Self {
        Self {
            period: config.period,
            name: format!("cci_{}", config.period),
        }
    }
}

impl Indicator for Cci {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn latest(&self, candles: &[Candle]) -> Result<f64, IndicatorError> {
        if self.period == 0 {
            return Err(IndicatorError::invalid("cci", "period must be >= 1"));
        }
        ensure_history(candles.len(), self.period)?;

        let typical: Vec<f64> = candles[candles.len() - self.period..]
            .iter()
            .map(Candle::typical_price)
            .collect();
        let mean = typical.iter().sum::<f64>() / self.period as f64;
        let mean_deviation =
            typical.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / self.period as f64;

        let current = finite(&self.name, typical[typical.len() - 1])?;
        finite(&self.name, mean_deviation)?;

        if mean_deviation == 0.0 {
            return Ok(0.0);
        }
        finite(&self.name, (current - mean) / (CCI_CONSTANT * mean_deviation))
    }
}
