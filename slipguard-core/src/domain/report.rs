//! Realized-slippage reports — immutable audit records of executed trades.

use super::trade::Side;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One realized-slippage record, appended to the bounded report log after a
/// trade executes. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlippageReport {
    pub symbol: String,
    pub side: Side,
    pub expected_price: f64,
    pub actual_price: f64,
    pub quantity: f64,
    /// Absolute price difference per unit.
    pub slippage_amount: f64,
    /// Difference as a percentage of the expected price.
    pub slippage_percent: f64,
    /// `slippage_amount * quantity`.
    pub total_slippage_cost: f64,
    /// Whether the realized percent stayed within the user's static limit
    /// (no dynamic widening is applied for record-keeping).
    pub within_limits: bool,
    pub timestamp: DateTime<Utc>,
}
