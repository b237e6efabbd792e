//! Integration tests: signal snapshot → bracket levels → trailing stop replay.

use chrono::{Duration, TimeZone, Utc};

use bandlab_core::risk::{
    initial_stop_loss, next_trailing_state, take_profit_ladder, RiskLevels, RiskManager,
    TrailingContext, TrailingState,
};
use bandlab_core::{build_snapshot, Candle, EngineConfig, Side, SignalGenerator, SignalType};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_candles(closes: &[f64]) -> Vec<Candle> {
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let open_time = base + Duration::minutes(15 * i as i64);
            Candle {
                open_time,
                close_time: open_time + Duration::minutes(15),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
            }
        })
        .collect()
}

fn breakout_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..59)
        .map(|i| {
            let i = i as f64;
            3000.0 - 2.0 * i - 0.1 * i * i
        })
        .collect();
    let last = closes[closes.len() - 1];
    closes.push(last + 400.0);
    closes
}

fn long_ctx() -> TrailingContext {
    TrailingContext {
        side: Side::Long,
        entry_price: 2000.0,
        initial_stop: 1990.0,
    }
}

// ── Levels ───────────────────────────────────────────────────────────

#[test]
fn ladder_from_known_risk() {
    assert_eq!(
        take_profit_ladder(2000.0, 1990.0, Side::Long),
        [2015.0, 2025.0, 2040.0]
    );
}

#[test]
fn levels_bracket_a_generated_long() {
    let candles = make_candles(&breakout_closes());
    let signal = SignalGenerator::new(EngineConfig::default()).generate_at(
        &candles,
        None,
        Utc::now(),
    );
    assert_eq!(signal.signal_type, SignalType::Long);
    let snapshot = signal.snapshot.unwrap();

    let levels = RiskManager::default().levels(Side::Long, signal.price, &snapshot);
    assert_eq!(levels.stop_loss, initial_stop_loss(Side::Long, &snapshot));
    assert!(levels.stop_loss < signal.price);
    assert!(levels.take_profits.windows(2).all(|w| w[0] < w[1]));
    assert!(levels.take_profits[0] > signal.price);
}

#[test]
fn short_levels_mirror_long() {
    let candles = make_candles(&breakout_closes());
    let snapshot = build_snapshot(&candles, &EngineConfig::default().indicators).unwrap();
    let levels = RiskLevels::from_snapshot(Side::Short, 2700.0, &snapshot);
    assert_eq!(
        levels.stop_loss,
        snapshot.keltner.upper.max(snapshot.bollinger.upper)
    );
    assert!(levels.take_profits.windows(2).all(|w| w[0] > w[1]));
}

// ── Trailing replay ──────────────────────────────────────────────────

#[test]
fn replay_activates_then_ratchets() {
    let ctx = long_ctx();
    let manager = RiskManager::new(1.0);
    let ticks = [2003.0, 2008.0, 2012.0, 2020.0, 2015.0, 2030.0, 2005.0];

    let mut state = TrailingState::default();
    let mut history = Vec::new();
    for price in ticks {
        state = manager.update_trailing(&ctx, &state, price, 4.0);
        history.push(state);
    }

    assert!(!history[0].active && !history[1].active);
    assert!(history[2].active);
    assert_eq!(history[2].trailing_stop, Some(2008.0));
    assert_eq!(history[3].trailing_stop, Some(2016.0));
    assert_eq!(history[4].trailing_stop, Some(2016.0));
    assert_eq!(history[5].trailing_stop, Some(2026.0));
    assert_eq!(history[6].trailing_stop, Some(2026.0));
    assert_eq!(history[6].extreme_price, Some(2030.0));
    assert!(history.iter().skip(2).all(|s| s.active));
}

#[test]
fn first_active_tick_locks_breakeven() {
    for atr in [0.5, 5.0, 50.0, 500.0] {
        let state = next_trailing_state(&long_ctx(), &TrailingState::default(), 2011.0, atr, 1.0);
        assert!(state.trailing_stop.unwrap() >= 2000.0, "atr {atr}");

        let short = TrailingContext {
            side: Side::Short,
            entry_price: 2000.0,
            initial_stop: 2010.0,
        };
        let state = next_trailing_state(&short, &TrailingState::default(), 1989.0, atr, 1.0);
        assert!(state.trailing_stop.unwrap() <= 2000.0, "atr {atr}");
    }
}

#[test]
fn trailing_state_round_trips_through_json() {
    let state = next_trailing_state(&long_ctx(), &TrailingState::default(), 2030.0, 5.0, 1.0);
    let json = serde_json::to_string(&state).unwrap();
    let back: TrailingState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}
