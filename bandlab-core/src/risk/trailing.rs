//! Breakeven-lock trailing stop.
//!
//! Passive until the position is 1R in profit, then the stop trails the
//! favorable extreme by `ATR * trailing_distance`, never behind the entry
//! price and never loosening. There is no way back to passive.

use serde::{Deserialize, Serialize};

use crate::domain::Side;

use super::ratchet::ratchet;

/// Profit, in R, at which trailing starts.
pub const ACTIVATION_R: f64 = 1.0;

/// Fixed facts about the position being trailed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailingContext {
    pub side: Side,
    pub entry_price: f64,
    pub initial_stop: f64,
}

impl TrailingContext {
    /// The 1R distance.
    pub fn risk(&self) -> f64 {
        (self.entry_price - self.initial_stop).abs()
    }

    /// Profit at `price` in multiples of the initial risk.
    pub fn profit_r(&self, price: f64) -> f64 {
        let profit = match self.side {
            Side::Long => price - self.entry_price,
            Side::Short => self.entry_price - price,
        };
        profit / self.risk()
    }
}

/// Caller-owned trailing state, replaced on every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailingState {
    /// Highest price seen for a long, lowest for a short.
    pub extreme_price: Option<f64>,
    pub trailing_stop: Option<f64>,
    pub active: bool,
}

/// Advance the trailing state by one price tick.
///
/// A non-finite price leaves the state unchanged. With zero risk distance no
/// R-multiple exists, so only the extreme moves and the state stays passive.
pub fn next_trailing_state(
    ctx: &TrailingContext,
    prev: &TrailingState,
    price: f64,
    atr: f64,
    trailing_distance: f64,
) -> TrailingState {
    if !price.is_finite() {
        return *prev;
    }

    let extreme = match (ctx.side, prev.extreme_price) {
        (Side::Long, Some(extreme)) => extreme.max(price),
        (Side::Short, Some(extreme)) => extreme.min(price),
        (_, None) => price,
    };

    let risk = ctx.risk();
    if !(risk.is_finite() && risk > 0.0) {
        return TrailingState {
            extreme_price: Some(extreme),
            ..*prev
        };
    }

    let active = prev.active || ctx.profit_r(price) >= ACTIVATION_R;
    if !active {
        return TrailingState {
            extreme_price: Some(extreme),
            trailing_stop: None,
            active: false,
        };
    }

    let offset = atr * trailing_distance;
    let candidate = if offset.is_finite() && offset >= 0.0 {
        match ctx.side {
            Side::Long => ctx.entry_price.max(extreme - offset),
            Side::Short => ctx.entry_price.min(extreme + offset),
        }
    } else {
        ctx.entry_price
    };

    TrailingState {
        extreme_price: Some(extreme),
        trailing_stop: Some(ratchet(ctx.side, prev.trailing_stop, candidate)),
        active: true,
    }
}
