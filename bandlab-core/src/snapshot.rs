//! Snapshot builder: one consistent point-in-time view of every indicator.
//!
//! The builder fails closed. A short history, or any adapter that cannot
//! produce a value, yields no snapshot at all rather than a partial one.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::IndicatorConfig;
use crate::domain::Candle;
use crate::error::IndicatorError;
use crate::indicators::{
    atr_series, Bands, Bollinger, Cci, Indicator, Keltner, Macd, MacdValue, Supertrend,
    SupertrendValue,
};

/// Minimum candle count before a snapshot is attempted (MACD 26 + 9).
pub const MIN_CANDLES: usize = 35;

/// Latest value of every indicator the entry evaluator and risk manager read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub keltner: Bands,
    pub bollinger: Bands,
    pub macd: MacdValue,
    pub cci: f64,
    pub supertrend: SupertrendValue,
    pub atr: f64,
}

/// Build the snapshot for the last candle of `candles`.
///
/// Returns `None` when the history is shorter than [`MIN_CANDLES`] or any
/// adapter fails. Insufficient data is logged at debug, anything else at warn.
pub fn build_snapshot(candles: &[Candle], config: &IndicatorConfig) -> Option<IndicatorSnapshot> {
    if candles.len() < MIN_CANDLES {
        debug!(
            available = candles.len(),
            needed = MIN_CANDLES,
            "not enough candles for a snapshot"
        );
        return None;
    }

    let keltner = run(&Keltner::new(config.keltner), candles)?;
    let bollinger = run(&Bollinger::new(config.bollinger), candles)?;
    let macd = run(&Macd::new(config.macd), candles)?;
    let cci = run(&Cci::new(config.cci), candles)?;
    let supertrend = run(&Supertrend::new(config.supertrend), candles)?;
    let atr = latest_atr(candles, config.atr_period)?;

    Some(IndicatorSnapshot {
        keltner,
        bollinger,
        macd,
        cci,
        supertrend,
        atr,
    })
}

fn run<I: Indicator>(indicator: &I, candles: &[Candle]) -> Option<I::Output> {
    match indicator.latest(candles) {
        Ok(value) => Some(value),
        Err(err) => {
            report(indicator.name(), &err);
            None
        }
    }
}

fn latest_atr(candles: &[Candle], period: usize) -> Option<f64> {
    let name = format!("atr_{period}");
    if period == 0 {
        report(&name, &IndicatorError::invalid("atr", "period must be >= 1"));
        return None;
    }

    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    match atr_series(&highs, &lows, &closes, period).last().copied() {
        Some(atr) if atr.is_finite() => Some(atr),
        Some(_) => {
            report(&name, &IndicatorError::NonFinite { indicator: name.clone() });
            None
        }
        None => {
            report(
                &name,
                &IndicatorError::InsufficientData {
                    needed: period + 1,
                    available: candles.len(),
                },
            );
            None
        }
    }
}

fn report(indicator: &str, err: &IndicatorError) {
    if err.is_insufficient_data() {
        debug!(indicator, error = %err, "indicator still warming up");
    } else {
        warn!(indicator, error = %err, "indicator failed, skipping snapshot");
    }
}
