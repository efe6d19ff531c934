//! Tolerance presets and the dynamic adjustment under poor conditions.

use crate::domain::ToleranceLevel;

/// Dynamic widening never exceeds this multiple of the base tolerance.
pub const DYNAMIC_TOLERANCE_CAP: f64 = 3.0;

/// Fixed max-slippage percentage for each named preset.
pub fn tolerance_for_level(level: ToleranceLevel) -> f64 {
    match level {
        ToleranceLevel::Strict => 0.1,
        ToleranceLevel::Moderate => 0.5,
        ToleranceLevel::Relaxed => 1.0,
    }
}

/// Widen a base tolerance under low liquidity or high volatility.
///
/// `liquidity_adj = 1 - score` when the score is below 0.5, else 0.
/// `volatility_adj = volatility / 10` when volatility exceeds 2.0, else 0.
/// The result is capped at 3x the base and never drops below it.
pub fn dynamic_tolerance(base: f64, liquidity_score: f64, volatility: f64) -> f64 {
    let liquidity_adj = if liquidity_score < 0.5 {
        1.0 - liquidity_score
    } else {
        0.0
    };
    let volatility_adj = if volatility > 2.0 {
        volatility / 10.0
    } else {
        0.0
    };
    (base * (1.0 + liquidity_adj + volatility_adj)).min(base * DYNAMIC_TOLERANCE_CAP)
}
