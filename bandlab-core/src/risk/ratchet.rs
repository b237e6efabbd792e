//! Ratchet rule for trailing stops.
//!
//! **Core Rule:** a stop may tighten, never loosen, even when ATR expands.

use crate::domain::Side;

/// Apply the ratchet to a proposed stop level.
///
/// - Long: the stop can only rise (`max(current, proposed)`).
/// - Short: the stop can only fall (`min(current, proposed)`).
/// - No current level: the proposed level is taken as is.
///
/// # Example
/// ```
/// use bandlab_core::domain::Side;
/// use bandlab_core::risk::ratchet;
///
/// // Tightening: 95 → 100 (allowed)
/// assert_eq!(ratchet(Side::Long, Some(95.0), 100.0), 100.0);
/// // Loosening: 100 → 90 (blocked)
/// assert_eq!(ratchet(Side::Long, Some(100.0), 90.0), 100.0);
/// ```
pub fn ratchet(side: Side, current: Option<f64>, proposed: f64) -> f64 {
    match current {
        None => proposed,
        Some(current) => match side {
            Side::Long => current.max(proposed),
            Side::Short => current.min(proposed),
        },
    }
}
