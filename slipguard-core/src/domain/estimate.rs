//! Estimation outputs: projected slippage, price range, liquidity score.

use serde::{Deserialize, Serialize};

/// Engine-level recommendation for a projected trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    /// Conditions favorable, execute normally.
    Proceed,
    /// Elevated slippage or thin liquidity; execute with care.
    Caution,
    /// Conditions poor enough that the trade should wait.
    Delay,
}

/// Expected execution price band around the reference price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Immutable output of one estimation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlippageEstimate {
    /// Projected slippage as a percentage of the reference price.
    pub estimated_slippage_percent: f64,
    /// Projected slippage in absolute price units.
    pub estimated_slippage_amount: f64,
    /// Volume-weighted price the book walk projects for the full quantity.
    pub execution_price: f64,
    /// Reference price the projection was measured against.
    pub current_market_price: f64,
    /// Expected execution band, widened by historical slippage for the symbol.
    pub price_range: PriceRange,
    /// Combined depth/spread/level score, always within [0, 1].
    pub liquidity_score: f64,
    pub recommendation: Recommendation,
    /// Human-readable list of the conditions that drove the recommendation.
    pub reasoning: String,
}

/// Realized slippage of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RealizedSlippage {
    /// Absolute price difference.
    pub amount: f64,
    /// Difference as a percentage of the expected price.
    pub percent: f64,
    /// `amount * quantity` — what the slippage cost in money terms.
    pub total_cost: f64,
}
