//! Engine configuration: one parameter block per indicator family, the
//! aggressiveness tier, and the trailing-stop distance.
//!
//! Every field has a default, so a TOML file only needs the values it changes:
//!
//! ```toml
//! aggressiveness = 2
//! trailing_distance = 0.5
//!
//! [keltner]
//! ma_period = 20
//! atr_period = 10
//! atr_multiple = 2.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Keltner Channel parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeltnerConfig {
    pub ma_period: usize,
    pub atr_period: usize,
    pub atr_multiple: f64,
}

impl Default for KeltnerConfig {
    fn default() -> Self {
        Self {
            ma_period: 20,
            atr_period: 10,
            atr_multiple: 2.0,
        }
    }
}

/// Bollinger Bands parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    pub period: usize,
    pub deviation: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            deviation: 2.0,
        }
    }
}

/// MACD parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl MacdConfig {
    /// The classic 12/26/9 setup. Crossover detection always uses this.
    pub const STANDARD: MacdConfig = MacdConfig {
        fast_period: 12,
        slow_period: 26,
        signal_period: 9,
    };

    /// Candles needed before two consecutive signal-line values exist.
    pub fn crossover_lookback(&self) -> usize {
        self.slow_period + self.signal_period
    }
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// CCI parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CciConfig {
    pub period: usize,
}

impl Default for CciConfig {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// SuperTrend parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupertrendConfig {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for SupertrendConfig {
    fn default() -> Self {
        Self {
            period: 10,
            multiplier: 3.0,
        }
    }
}

/// All indicator parameters consumed by the snapshot builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub keltner: KeltnerConfig,
    pub bollinger: BollingerConfig,
    pub macd: MacdConfig,
    pub cci: CciConfig,
    pub supertrend: SupertrendConfig,
    pub atr_period: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            keltner: KeltnerConfig::default(),
            bollinger: BollingerConfig::default(),
            macd: MacdConfig::default(),
            cci: CciConfig::default(),
            supertrend: SupertrendConfig::default(),
            atr_period: 14,
        }
    }
}

/// How strict the auxiliary entry filter is. Serialized as the integer 1, 2 or 3.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Aggressiveness {
    #[default]
    Conservative = 1,
    Moderate = 2,
    Aggressive = 3,
}

impl Aggressiveness {
    pub const ALL: [Aggressiveness; 3] = [
        Aggressiveness::Conservative,
        Aggressiveness::Moderate,
        Aggressiveness::Aggressive,
    ];

    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Aggressiveness::Conservative => "conservative",
            Aggressiveness::Moderate => "moderate",
            Aggressiveness::Aggressive => "aggressive",
        }
    }
}

impl TryFrom<u8> for Aggressiveness {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Aggressiveness::Conservative),
            2 => Ok(Aggressiveness::Moderate),
            3 => Ok(Aggressiveness::Aggressive),
            other => Err(format!("aggressiveness must be 1, 2 or 3, got {other}")),
        }
    }
}

impl From<Aggressiveness> for u8 {
    fn from(tier: Aggressiveness) -> Self {
        tier.level()
    }
}

impl std::fmt::Display for Aggressiveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tier {} ({})", self.level(), self.name())
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(flatten)]
    pub indicators: IndicatorConfig,
    pub aggressiveness: Aggressiveness,
    /// Trailing-stop distance as a multiple of ATR.
    pub trailing_distance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            aggressiveness: Aggressiveness::default(),
            trailing_distance: 1.0,
        }
    }
}

impl EngineConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter sets no indicator can compute with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ind = &self.indicators;
        let periods = [
            ("keltner.ma_period", ind.keltner.ma_period),
            ("keltner.atr_period", ind.keltner.atr_period),
            ("bollinger.period", ind.bollinger.period),
            ("macd.fast_period", ind.macd.fast_period),
            ("macd.slow_period", ind.macd.slow_period),
            ("macd.signal_period", ind.macd.signal_period),
            ("cci.period", ind.cci.period),
            ("supertrend.period", ind.supertrend.period),
            ("atr_period", ind.atr_period),
        ];
        for (name, period) in periods {
            if period == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be >= 1")));
            }
        }

        let multipliers = [
            ("keltner.atr_multiple", ind.keltner.atr_multiple),
            ("bollinger.deviation", ind.bollinger.deviation),
            ("supertrend.multiplier", ind.supertrend.multiplier),
            ("trailing_distance", self.trailing_distance),
        ];
        for (name, value) in multipliers {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if ind.macd.fast_period >= ind.macd.slow_period {
            return Err(ConfigError::Invalid(format!(
                "macd.fast_period ({}) must be below macd.slow_period ({})",
                ind.macd.fast_period, ind.macd.slow_period
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            aggressiveness = 3
            trailing_distance = 0.5

            [keltner]
            atr_multiple = 1.5
            "#,
        )
        .unwrap();

        assert_eq!(config.aggressiveness, Aggressiveness::Aggressive);
        assert_eq!(config.trailing_distance, 0.5);
        assert_eq!(config.indicators.keltner.atr_multiple, 1.5);
        assert_eq!(config.indicators.keltner.ma_period, 20);
        assert_eq!(config.indicators.macd, MacdConfig::STANDARD);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn aggressiveness_out_of_range_rejected() {
        let err = EngineConfig::from_toml("aggressiveness = 4").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_period_rejected() {
        let err = EngineConfig::from_toml("[cci]\nperiod = 0").unwrap_err();
        assert!(err.to_string().contains("cci.period"));
    }

    #[test]
    fn non_positive_trailing_distance_rejected() {
        let err = EngineConfig::from_toml("trailing_distance = 0.0").unwrap_err();
        assert!(err.to_string().contains("trailing_distance"));
    }

    #[test]
    fn inverted_macd_periods_rejected() {
        let err = EngineConfig::from_toml("[macd]\nfast_period = 30\nslow_period = 26").unwrap_err();
        assert!(err.to_string().contains("macd.fast_period"));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let mut config = EngineConfig::default();
        config.aggressiveness = Aggressiveness::Moderate;
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("aggressiveness = 2"));
        let parsed = EngineConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn aggressiveness_levels_and_names() {
        assert_eq!(Aggressiveness::Conservative.level(), 1);
        assert_eq!(Aggressiveness::Aggressive.name(), "aggressive");
        assert_eq!(Aggressiveness::Moderate.to_string(), "tier 2 (moderate)");
        assert!(Aggressiveness::try_from(0).is_err());
    }

    #[test]
    fn standard_macd_needs_35_candles_for_a_crossover() {
        assert_eq!(MacdConfig::STANDARD.crossover_lookback(), 35);
    }
}
