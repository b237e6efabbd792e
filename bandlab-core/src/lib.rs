//! BandLab Core — indicator snapshots, tiered entry guards, signal generation, position risk.
//!
//! Data flows one way:
//! candles → [`snapshot`] → [`entry`] → [`generator`] → (signal consumed externally) → [`risk`].
//!
//! - Indicator adapters (Keltner, Bollinger, MACD, CCI, SuperTrend, ATR)
//! - Fail-closed snapshot builder
//! - Entry evaluator with per-tier thresholds
//! - Signal generator with an injected observer
//! - Stop-loss, take-profit ladder and ratcheted breakeven trailing stop

pub mod config;
pub mod data;
pub mod domain;
pub mod entry;
pub mod error;
pub mod generator;
pub mod indicators;
pub mod risk;
pub mod snapshot;

pub use config::{Aggressiveness, EngineConfig, IndicatorConfig};
pub use domain::{Candle, Side, Signal, SignalType};
pub use generator::{SignalGenerator, SignalObserver, SignalStats, TracingObserver};
pub use snapshot::{build_snapshot, IndicatorSnapshot, MIN_CANDLES};
