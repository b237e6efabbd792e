//! Entry evaluator: tiered, short-circuiting guards over one snapshot.
//!
//! Guards run in a fixed order and stop at the first failure:
//!
//! 1. Channel breakout: price beyond the Keltner band, then beyond the
//!    Bollinger band (both required).
//! 2. MACD crossover on the latest candle, always with the 12/26/9 setup.
//! 3. Tier filter: CCI threshold and, for tiers 1 and 2, SuperTrend direction.
//!
//! Every comparison is strict, so a value sitting exactly on a threshold fails.

use serde::{Deserialize, Serialize};

use crate::config::{Aggressiveness, MacdConfig};
use crate::domain::{Candle, Side};
use crate::indicators::{is_bearish_crossover, is_bullish_crossover, Trend};
use crate::snapshot::IndicatorSnapshot;

/// Auxiliary filter thresholds for one aggressiveness tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// CCI must be strictly above this for a long.
    pub cci_long: f64,
    /// CCI must be strictly below this for a short.
    pub cci_short: f64,
    /// Whether SuperTrend must point in the trade direction.
    pub require_supertrend: bool,
}

impl Aggressiveness {
    pub fn thresholds(self) -> TierThresholds {
        match self {
            Aggressiveness::Conservative => TierThresholds {
                cci_long: 100.0,
                cci_short: -100.0,
                require_supertrend: true,
            },
            Aggressiveness::Moderate => TierThresholds {
                cci_long: 50.0,
                cci_short: -50.0,
                require_supertrend: true,
            },
            Aggressiveness::Aggressive => TierThresholds {
                cci_long: 0.0,
                cci_short: 0.0,
                require_supertrend: false,
            },
        }
    }
}

/// Result of evaluating one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDecision {
    pub signal: bool,
    pub reason: String,
}

impl EntryDecision {
    fn accept(reason: String) -> Self {
        Self {
            signal: true,
            reason,
        }
    }

    fn reject(reason: String) -> Self {
        Self {
            signal: false,
            reason,
        }
    }
}

/// Evaluate a long entry at `price`.
///
/// `confirmation` is the higher-timeframe snapshot when one could be built.
/// It is accepted for callers that have one but does not gate the decision.
pub fn evaluate_long(
    price: f64,
    snapshot: &IndicatorSnapshot,
    candles: &[Candle],
    tier: Aggressiveness,
    confirmation: Option<&IndicatorSnapshot>,
) -> EntryDecision {
    evaluate(Side::Long, price, snapshot, candles, tier, confirmation)
}

/// Evaluate a short entry at `price`. Mirror of [`evaluate_long`].
pub fn evaluate_short(
    price: f64,
    snapshot: &IndicatorSnapshot,
    candles: &[Candle],
    tier: Aggressiveness,
    confirmation: Option<&IndicatorSnapshot>,
) -> EntryDecision {
    evaluate(Side::Short, price, snapshot, candles, tier, confirmation)
}

/// Run the guard pipeline for `side`.
pub fn evaluate(
    side: Side,
    price: f64,
    snapshot: &IndicatorSnapshot,
    candles: &[Candle],
    tier: Aggressiveness,
    _confirmation: Option<&IndicatorSnapshot>,
) -> EntryDecision {
    let (keltner, bollinger, band, op, fail_op) = match side {
        Side::Long => (
            snapshot.keltner.upper,
            snapshot.bollinger.upper,
            "upper",
            ">",
            "<=",
        ),
        Side::Short => (
            snapshot.keltner.lower,
            snapshot.bollinger.lower,
            "lower",
            "<",
            ">=",
        ),
    };

    if !beyond(side, price, keltner) {
        return EntryDecision::reject(format!(
            "Keltner: price {price:.2} {fail_op} {band} band {keltner:.2}"
        ));
    }
    if !beyond(side, price, bollinger) {
        return EntryDecision::reject(format!(
            "Bollinger: price {price:.2} {fail_op} {band} band {bollinger:.2}"
        ));
    }

    let (crossed, direction) = match side {
        Side::Long => (is_bullish_crossover(candles, &MacdConfig::STANDARD), "bullish"),
        Side::Short => (is_bearish_crossover(candles, &MacdConfig::STANDARD), "bearish"),
    };
    if !crossed {
        return EntryDecision::reject(format!("MACD: no {direction} crossover"));
    }

    let thresholds = tier.thresholds();
    let (cci_threshold, wanted_trend) = match side {
        Side::Long => (thresholds.cci_long, Trend::Up),
        Side::Short => (thresholds.cci_short, Trend::Down),
    };
    let cci = snapshot.cci;
    if !beyond(side, cci, cci_threshold) {
        return EntryDecision::reject(format!(
            "CCI: {cci:.2} {fail_op} {cci_threshold} required by {tier}"
        ));
    }

    let mut reason = format!(
        "{side} entry, {tier}: price {op} Keltner and Bollinger {band}, {direction} MACD crossover, CCI={} {op} {cci_threshold}",
        cci.round()
    );

    if thresholds.require_supertrend {
        let trend = snapshot.supertrend.trend;
        if trend != wanted_trend {
            return EntryDecision::reject(format!(
                "SuperTrend: trend {trend}, {tier} requires {wanted_trend}"
            ));
        }
        reason.push_str(&format!(", SuperTrend {trend}"));
    }

    EntryDecision::accept(reason)
}

/// Strictly past `level` in the direction of `side`. NaN is never past.
fn beyond(side: Side, value: f64, level: f64) -> bool {
    match side {
        Side::Long => value > level,
        Side::Short => value < level,
    }
}
