//! Market depth provider trait and structured error types.
//!
//! The MarketDepthProvider trait abstracts over market-data sources (exchange
//! feeds, aggregators, replay fixtures) so the engine can be wired to any of
//! them and mocked for tests. The engine never retries a failed fetch; retry
//! policy belongs to the provider or its caller.

use crate::domain::{MarketSnapshot, Side};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Errors from depth/price fetches. Propagated unchanged by the engine.
#[derive(Debug, Error)]
pub enum DepthError {
    #[error("no market data for symbol '{symbol}'")]
    UnknownSymbol { symbol: String },

    #[error("market depth unavailable for '{symbol}': {reason}")]
    Unavailable { symbol: String, reason: String },
}

/// Capability contract for market data. Both calls are I/O-bound at the real
/// boundary and may fail with a data-unavailable condition.
pub trait MarketDepthProvider: Send + Sync {
    /// Current reference price for a trade of the given side.
    fn current_price(&self, symbol: &str, side: Side) -> Result<f64, DepthError>;

    /// Full bid/ask ladder snapshot.
    fn depth(&self, symbol: &str) -> Result<MarketSnapshot, DepthError>;
}

/// In-memory provider serving fixed snapshots — for tests, demos, and benches.
#[derive(Debug, Default)]
pub struct StaticDepthProvider {
    books: RwLock<HashMap<String, MarketSnapshot>>,
}

impl StaticDepthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the snapshot served for a symbol.
    pub fn insert(&self, snapshot: MarketSnapshot) {
        self.books
            .write()
            .unwrap()
            .insert(snapshot.symbol.clone(), snapshot);
    }

    pub fn remove(&self, symbol: &str) {
        self.books.write().unwrap().remove(symbol);
    }
}

impl MarketDepthProvider for StaticDepthProvider {
    fn current_price(&self, symbol: &str, side: Side) -> Result<f64, DepthError> {
        let books = self.books.read().unwrap();
        let snapshot = books.get(symbol).ok_or_else(|| DepthError::UnknownSymbol {
            symbol: symbol.to_string(),
        })?;
        // Best executable quote for the side, falling back to the reference price.
        let best = match side {
            Side::Buy => snapshot.best_ask(),
            Side::Sell => snapshot.best_bid(),
        };
        Ok(best.unwrap_or(snapshot.current_price))
    }

    fn depth(&self, symbol: &str) -> Result<MarketSnapshot, DepthError> {
        self.books
            .read()
            .unwrap()
            .get(symbol)
            .cloned()
            .ok_or_else(|| DepthError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }
}
