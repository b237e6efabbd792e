//! Signal — the hand-off value produced once per generator call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::snapshot::IndicatorSnapshot;

/// Outcome of one signal evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Long,
    Short,
    None,
}

/// Immutable decision record.
///
/// `snapshot` is attached whenever the primary snapshot could be built,
/// including on a `None` decision, so callers can inspect why nothing fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub signal_type: SignalType,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub snapshot: Option<IndicatorSnapshot>,
}

impl Signal {
    pub fn none(reason: impl Into<String>, timestamp: DateTime<Utc>, price: f64) -> Self {
        Self {
            signal_type: SignalType::None,
            reason: reason.into(),
            timestamp,
            price,
            snapshot: None,
        }
    }

    pub fn is_entry(&self) -> bool {
        self.signal_type != SignalType::None
    }
}
