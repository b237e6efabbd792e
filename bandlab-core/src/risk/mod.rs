//! Position risk: initial stop-loss, take-profit ladder, trailing stop.
//!
//! Independent of signal generation. Everything here is a pure function of
//! its inputs; [`RiskManager`] only carries the configured trailing distance.

pub mod levels;
pub mod ratchet;
pub mod trailing;

pub use levels::{initial_stop_loss, take_profit_ladder, RiskLevels, TAKE_PROFIT_R_MULTIPLES};
pub use ratchet::ratchet;
pub use trailing::{next_trailing_state, TrailingContext, TrailingState, ACTIVATION_R};

use crate::config::EngineConfig;
use crate::domain::Side;
use crate::snapshot::IndicatorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskManager {
    trailing_distance: f64,
}

impl RiskManager {
    pub fn new(trailing_distance: f64) -> Self {
        Self { trailing_distance }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.trailing_distance)
    }

    pub fn trailing_distance(&self) -> f64 {
        self.trailing_distance
    }

    pub fn levels(&self, side: Side, entry_price: f64, snapshot: &IndicatorSnapshot) -> RiskLevels {
        RiskLevels::from_snapshot(side, entry_price, snapshot)
    }

    /// Next trailing state for one price tick, using the configured distance.
    pub fn update_trailing(
        &self,
        ctx: &TrailingContext,
        prev: &TrailingState,
        price: f64,
        atr: f64,
    ) -> TrailingState {
        next_trailing_state(ctx, prev, price, atr, self.trailing_distance)
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
