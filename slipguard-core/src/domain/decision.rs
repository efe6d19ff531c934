//! Protection decisions — the transient output of one validation call.

use serde::{Deserialize, Serialize};

/// Policy-level recommendation. Unlike the engine's `Recommendation`, a poor
/// market maps to an outright `Reject` here rather than `Delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionRecommendation {
    Proceed,
    Caution,
    Reject,
}

/// Outcome of `validate_trade_execution`. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionDecision {
    pub allowed: bool,
    /// Formatted explanation, always naming the estimated and allowed percentages.
    pub reason: String,
    /// Estimated slippage percent for the requested quantity.
    pub estimated_slippage: f64,
    /// Effective limit after any dynamic adjustment.
    pub max_allowed_slippage: f64,
    pub recommendation: DecisionRecommendation,
}
