//! Signal generator: candles in, exactly one [`Signal`] out.
//!
//! Long is evaluated before short; the first direction whose guards all pass
//! wins. Emission is reported to an optional [`SignalObserver`] and counted in
//! a caller-owned [`SignalStats`], so the generator itself holds no mutable
//! state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::domain::{Candle, Signal, SignalType};
use crate::entry::{evaluate_long, evaluate_short};
use crate::snapshot::{build_snapshot, IndicatorSnapshot};

pub const REASON_NO_DATA: &str = "no candle data";
pub const REASON_INSUFFICIENT: &str = "insufficient data for indicators";
pub const REASON_NO_ENTRY: &str = "no entry conditions met";

/// Receives every signal the generator produces.
pub trait SignalObserver: Send + Sync {
    fn on_signal(&self, signal: &Signal);
}

/// Default observer: logs entries at info and non-entries at debug.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SignalObserver for TracingObserver {
    fn on_signal(&self, signal: &Signal) {
        match signal.signal_type {
            SignalType::Long | SignalType::Short => info!(
                signal = ?signal.signal_type,
                price = signal.price,
                timestamp = %signal.timestamp,
                reason = %signal.reason,
                "entry signal"
            ),
            SignalType::None => debug!(
                price = signal.price,
                reason = %signal.reason,
                "no signal"
            ),
        }
    }
}

/// Running counts of generator outcomes, accumulated by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalStats {
    pub checks: u64,
    pub long: u64,
    pub short: u64,
    pub none: u64,
}

impl SignalStats {
    pub fn record(&mut self, signal: &Signal) {
        self.checks += 1;
        match signal.signal_type {
            SignalType::Long => self.long += 1,
            SignalType::Short => self.short += 1,
            SignalType::None => self.none += 1,
        }
    }
}

pub struct SignalGenerator {
    config: EngineConfig,
    observer: Option<Box<dyn SignalObserver>>,
}

impl std::fmt::Debug for SignalGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalGenerator")
            .field("config", &self.config)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl SignalGenerator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl SignalObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate the latest primary candle, stamping an empty-input result with
    /// the current time.
    pub fn generate(&self, primary: &[Candle], confirmation: Option<&[Candle]>) -> Signal {
        self.generate_at(primary, confirmation, Utc::now())
    }

    /// Like [`generate`](Self::generate) with an explicit fallback timestamp.
    pub fn generate_at(
        &self,
        primary: &[Candle],
        confirmation: Option<&[Candle]>,
        now: DateTime<Utc>,
    ) -> Signal {
        let signal = self.decide(primary, confirmation, now);
        if let Some(observer) = &self.observer {
            observer.on_signal(&signal);
        }
        signal
    }

    fn decide(
        &self,
        primary: &[Candle],
        confirmation: Option<&[Candle]>,
        now: DateTime<Utc>,
    ) -> Signal {
        let Some(current) = primary.last() else {
            return Signal::none(REASON_NO_DATA, now, 0.0);
        };
        let price = current.close;
        let timestamp = current.close_time;
        let indicators = &self.config.indicators;

        let Some(snapshot) = build_snapshot(primary, indicators) else {
            return Signal::none(REASON_INSUFFICIENT, timestamp, price);
        };

        let confirmation = confirmation
            .filter(|candles| !candles.is_empty())
            .and_then(|candles| {
                let built = build_snapshot(candles, indicators);
                if built.is_none() {
                    debug!(candles = candles.len(), "confirmation snapshot unavailable");
                }
                built
            });

        let tier = self.config.aggressiveness;
        let long = evaluate_long(price, &snapshot, primary, tier, confirmation.as_ref());
        if long.signal {
            return entry(SignalType::Long, long.reason, timestamp, price, snapshot);
        }

        let short = evaluate_short(price, &snapshot, primary, tier, confirmation.as_ref());
        if short.signal {
            return entry(SignalType::Short, short.reason, timestamp, price, snapshot);
        }

        debug!(long = %long.reason, short = %short.reason, "entry guards not met");
        Signal {
            snapshot: Some(snapshot),
            ..Signal::none(REASON_NO_ENTRY, timestamp, price)
        }
    }
}

fn entry(
    signal_type: SignalType,
    reason: String,
    timestamp: DateTime<Utc>,
    price: f64,
    snapshot: IndicatorSnapshot,
) -> Signal {
    Signal {
        signal_type,
        reason,
        timestamp,
        price,
        snapshot: Some(snapshot),
    }
}
