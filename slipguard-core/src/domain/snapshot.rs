//! Order-book snapshots — the market view one estimation call runs against.

use super::trade::Side;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One price level of an order book side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: f64,
    pub quantity: f64,
}

impl BookLevel {
    pub fn new(price: f64, quantity: f64) -> Self {
        Self { price, quantity }
    }
}

/// Point-in-time order book: bid and ask ladders plus a reference price.
///
/// Both sides are sorted by execution priority, best price first: bids
/// descending, asks ascending. A snapshot is owned transiently by one
/// estimation call and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub current_price: f64,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    pub captured_at: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn new(
        symbol: impl Into<String>,
        current_price: f64,
        bids: Vec<BookLevel>,
        asks: Vec<BookLevel>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            current_price,
            bids,
            asks,
            captured_at: Utc::now(),
        }
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price)
    }

    /// Midpoint of the best bid/ask, if both sides have depth.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }

    /// The ladder a trade of the given side executes against:
    /// asks for a buy, bids for a sell.
    pub fn levels_against(&self, side: Side) -> &[BookLevel] {
        match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot::new(
            "BTC/USD",
            45_000.0,
            vec![BookLevel::new(44_990.0, 1.0), BookLevel::new(44_980.0, 2.0)],
            vec![BookLevel::new(45_010.0, 1.5), BookLevel::new(45_020.0, 3.0)],
        )
    }

    #[test]
    fn best_quotes_come_from_front_of_ladder() {
        let snap = snapshot();
        assert_eq!(snap.best_bid(), Some(44_990.0));
        assert_eq!(snap.best_ask(), Some(45_010.0));
        assert_eq!(snap.mid_price(), Some(45_000.0));
    }

    #[test]
    fn buy_walks_asks_sell_walks_bids() {
        let snap = snapshot();
        assert_eq!(snap.levels_against(Side::Buy)[0].price, 45_010.0);
        assert_eq!(snap.levels_against(Side::Sell)[0].price, 44_990.0);
    }

    #[test]
    fn mid_price_requires_both_sides() {
        let snap = MarketSnapshot::new("X", 10.0, vec![], vec![BookLevel::new(10.1, 1.0)]);
        assert_eq!(snap.mid_price(), None);
    }
}
