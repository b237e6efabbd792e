//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + deviation * stddev(close, period)
//! - Lower: middle - deviation * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use crate::config::BollingerConfig;
use crate::domain::Candle;
use crate::error::IndicatorError;

use super::{ensure_history, finite, Bands, Indicator};

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    deviation: f64,
    name: String,
}

impl Bollinger {
    pub fn new(config: BollingerConfig) -> Self {
        Self {
            period: config.period,
            deviation: config.deviation,
            name: format!("bollinger_{}_{}", config.period, config.deviation),
        }
    }
}

impl Indicator for Bollinger {
    type Output = Bands;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn latest(&self, candles: &[Candle]) -> Result<Bands, IndicatorError> {
        if self.period == 0 {
            return Err(IndicatorError::invalid("bollinger", "period must be >= 1"));
        }
        if !(self.deviation.is_finite() && self.deviation > 0.0) {
            return Err(IndicatorError::invalid(
                "bollinger",
                format!("deviation must be positive, got {}", self.deviation),
            ));
        }
        ensure_history(candles.len(), self.period)?;

        let window = &candles[candles.len() - self.period..];
        let mean = window.iter().map(|c| c.close).sum::<f64>() / self.period as f64;
        let variance = window
            .iter()
            .map(|c| {
                let diff = c.close - mean;
                diff * diff
            })
            .sum::<f64>()
            / self.period as f64;
        let stddev = variance.sqrt();

        let bands = Bands {
            upper: mean + self.deviation * stddev,
            middle: mean,
            lower: mean - self.deviation * stddev,
        };
        finite(&self.name, bands.upper)?;
        finite(&self.name, bands.lower)?;
        Ok(bands)
    }
}
