//! Initial stop-loss and R-multiple take-profit ladder.

use serde::{Deserialize, Serialize};

use crate::domain::Side;
use crate::snapshot::IndicatorSnapshot;

/// Take-profit distances as multiples of the initial risk.
pub const TAKE_PROFIT_R_MULTIPLES: [f64; 3] = [1.5, 2.5, 4.0];

/// Stop-loss beyond the wider of the two channels on the losing side.
///
/// Long: min(Keltner lower, Bollinger lower). Short: max(Keltner upper,
/// Bollinger upper). The entry price plays no part.
pub fn initial_stop_loss(side: Side, snapshot: &IndicatorSnapshot) -> f64 {
    match side {
        Side::Long => snapshot.keltner.lower.min(snapshot.bollinger.lower),
        Side::Short => snapshot.keltner.upper.max(snapshot.bollinger.upper),
    }
}

/// Three take-profit levels at 1.5R, 2.5R and 4R from `entry`.
///
/// Ascending for long, descending for short.
pub fn take_profit_ladder(entry: f64, stop_loss: f64, side: Side) -> [f64; 3] {
    let risk = (entry - stop_loss).abs();
    TAKE_PROFIT_R_MULTIPLES.map(|r| match side {
        Side::Long => entry + r * risk,
        Side::Short => entry - r * risk,
    })
}

/// Everything needed to place a bracket around a fresh position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLevels {
    pub side: Side,
    pub entry_price: f64,
    pub stop_loss: f64,
    /// |entry - stop_loss|, the 1R distance.
    pub risk: f64,
    pub take_profits: [f64; 3],
}

impl RiskLevels {
    pub fn from_snapshot(side: Side, entry_price: f64, snapshot: &IndicatorSnapshot) -> Self {
        let stop_loss = initial_stop_loss(side, snapshot);
        Self {
            side,
            entry_price,
            stop_loss,
            risk: (entry_price - stop_loss).abs(),
            take_profits: take_profit_ladder(entry_price, stop_loss, side),
        }
    }
}
