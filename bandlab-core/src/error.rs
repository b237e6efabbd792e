//! Error types shared across the core.

use thiserror::Error;

/// Failure of an indicator adapter.
///
/// `InsufficientData` is the expected warm-up condition; every other variant
/// is unexpected and gets logged by the snapshot builder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("insufficient data: need {needed} candles, have {available}")]
    InsufficientData { needed: usize, available: usize },
    #[error("invalid {indicator} parameter: {reason}")]
    InvalidParameter { indicator: String, reason: String },
    #[error("{indicator} produced a non-finite value")]
    NonFinite { indicator: String },
}

impl IndicatorError {
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }

    pub(crate) fn invalid(indicator: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            indicator: indicator.to_string(),
            reason: reason.into(),
        }
    }
}

/// Invalid or unreadable engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Unreadable or malformed candle data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("read candles: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse candles CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: candle fails OHLC sanity check")]
    InsaneCandle { row: usize },
    #[error("row {row}: candle opens before the previous candle")]
    OutOfOrder { row: usize },
}
