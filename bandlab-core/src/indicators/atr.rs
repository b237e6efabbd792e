//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR uses Wilder smoothing (EMA with alpha = 1/period).
//! Lookback: period (TR[0] has no previous close, so the seed starts at TR[1]).

use crate::domain::Candle;
use crate::error::IndicatorError;

use super::{ensure_history, last_finite, Indicator};

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// Compute the True Range series from parallel high/low/close slices.
///
/// TR[0] is NaN (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    let mut tr = vec![f64::NAN; n];

    for i in 1..n {
        let h = highs[i];
        let l = lows[i];
        let pc = closes[i - 1];
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

/// True Range of a candle sequence.
pub fn candle_true_range(candles: &[Candle]) -> Vec<f64> {
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    true_range(&highs, &lows, &closes)
}

/// Apply Wilder smoothing to a series. Alpha = 1/period.
/// Seed: mean of the first run of `period` consecutive non-NaN values.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    // First index that starts `period` consecutive non-NaN values.
    let mut run = 0;
    let mut seed_end = None;
    for (i, v) in values.iter().enumerate() {
        if v.is_nan() {
            run = 0;
            continue;
        }
        run += 1;
        if run == period {
            seed_end = Some(i + 1);
            break;
        }
    }

    let seed_end = match seed_end {
        Some(end) => end,
        None => return result,
    };

    let seed: f64 = values[seed_end - period..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;

    for i in seed_end..n {
        if values[i].is_nan() {
            // NaN taints everything after it.
            return result;
        }
        let smoothed = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

/// ATR series adapter.
///
/// Returns only the defined ATR values, so the output is shorter than the
/// input by the warm-up length at the front; the last element lines up with
/// the last input bar. Empty when there is not enough data.
pub fn atr_series(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let tr = true_range(highs, lows, closes);
    let smoothed = wilder_smooth(&tr, period);
    match smoothed.iter().position(|v| !v.is_nan()) {
        Some(start) => smoothed[start..].to_vec(),
        None => Vec::new(),
    }
}

impl Indicator for Atr {
    type Output = f64;

    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn latest(&self, candles: &[Candle]) -> Result<f64, IndicatorError> {
        if self.period == 0 {
            return Err(IndicatorError::invalid("atr", "period must be >= 1"));
        }
        ensure_history(candles.len(), self.lookback() + 1)?;
        let tr = candle_true_range(candles);
        last_finite(&self.name, &wilder_smooth(&tr, self.period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_candles, DEFAULT_EPSILON};

    fn split(data: &[(f64, f64, f64, f64)]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            data.iter().map(|d| d.1).collect(),
            data.iter().map(|d| d.2).collect(),
            data.iter().map(|d| d.3).collect(),
        )
    }

    const DATA: [(f64, f64, f64, f64); 5] = [
        (100.0, 105.0, 95.0, 102.0),  // TR = NaN (no prev close)
        (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
        (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        (99.0, 103.0, 97.0, 101.0),   // TR = 6
        (101.0, 106.0, 100.0, 105.0), // TR = 6
    ];

    #[test]
    fn true_range_basic() {
        let (h, l, c) = split(&DATA[..3]);
        let tr = true_range(&h, &l, &c);
        assert!(tr[0].is_nan());
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // Gap up: prev close 100, current bar 110-115-108
        let (h, l, c) = split(&[(98.0, 102.0, 97.0, 100.0), (110.0, 115.0, 108.0, 112.0)]);
        let tr = true_range(&h, &l, &c);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_3() {
        let candles = make_ohlc_candles(&DATA);
        // Seed uses TR[1..=3] = [8, 9, 6] → 23/3
        // ATR[4] = (1/3)*6 + (2/3)*(23/3) = 64/9
        let atr = Atr::new(3).latest(&candles).unwrap();
        assert_approx(atr, 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_series_is_trimmed_and_aligned() {
        let (h, l, c) = split(&DATA);
        let series = atr_series(&h, &l, &c, 3);
        assert_eq!(series.len(), 2);
        assert_approx(series[0], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(series[1], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_series_empty_when_short() {
        let (h, l, c) = split(&DATA[..2]);
        assert!(atr_series(&h, &l, &c, 3).is_empty());
    }

    #[test]
    fn atr_insufficient_data() {
        let candles = make_ohlc_candles(&DATA[..3]);
        let err = Atr::new(3).latest(&candles).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn atr_zero_period_is_invalid() {
        let candles = make_ohlc_candles(&DATA);
        let err = Atr::new(0).latest(&candles).unwrap_err();
        assert!(!err.is_insufficient_data());
    }

    #[test]
    fn atr_nan_after_seed_is_non_finite() {
        let mut candles = make_ohlc_candles(&DATA);
        candles[4].high = f64::NAN;
        let err = Atr::new(3).latest(&candles).unwrap_err();
        assert!(matches!(err, IndicatorError::NonFinite { .. }));
    }

    #[test]
    fn atr_lookback() {
        assert_eq!(Atr::new(14).lookback(), 14);
    }
}
