//! Trade requests — the immutable input to every estimation/protection call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which way the trade goes.
///
/// A buy executes against the ask side of the book; a sell against the bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// A single market-order request submitted for slippage evaluation.
///
/// One value per call; never mutated after construction. `expected_price` is
/// the caller's own reference (e.g. the price shown to the user); when absent,
/// the snapshot's current market price is used as the reference instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRequest {
    pub symbol: String,
    pub side: Side,
    pub quantity: f64,
    pub expected_price: Option<f64>,
    pub timestamp: DateTime<Utc>,
    /// Set when the trade runs under a user's preference profile.
    pub user_id: Option<String>,
}

impl TradeRequest {
    pub fn new(symbol: impl Into<String>, side: Side, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            expected_price: None,
            timestamp: Utc::now(),
            user_id: None,
        }
    }

    pub fn with_expected_price(mut self, price: f64) -> Self {
        self.expected_price = Some(price);
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
