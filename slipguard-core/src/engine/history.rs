//! Per-symbol historical slippage store.
//!
//! The store is the engine's only mutable state. Updates for a symbol must be
//! applied atomically: concurrent callers may never lose an increment or
//! observe a count/average pair from two different updates.

use crate::domain::HistoricalSlippageStats;
use std::collections::HashMap;
use std::sync::Mutex;

/// Capability contract for the history store. Injectable so the in-memory map
/// can be swapped for any concurrent-safe key-value backing.
pub trait HistoryStore: Send + Sync {
    fn get(&self, symbol: &str) -> Option<HistoricalSlippageStats>;

    /// Fold one realized slippage observation into the symbol's running stats,
    /// creating the record on first update. Atomic per symbol.
    fn update(&self, symbol: &str, slippage_percent: f64);

    /// Copy of all per-symbol records.
    fn snapshot(&self) -> HashMap<String, HistoricalSlippageStats>;

    /// Drop every record. The only way stats ever reset.
    fn clear(&self);
}

/// Default store: a single map behind a mutex. The whole-map lock serializes
/// all updates, which trivially satisfies per-symbol atomicity.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    stats: Mutex<HashMap<String, HistoricalSlippageStats>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn get(&self, symbol: &str) -> Option<HistoricalSlippageStats> {
        self.stats.lock().unwrap().get(symbol).copied()
    }

    fn update(&self, symbol: &str, slippage_percent: f64) {
        let mut stats = self.stats.lock().unwrap();
        match stats.get_mut(symbol) {
            Some(record) => record.absorb(slippage_percent),
            None => {
                stats.insert(
                    symbol.to_string(),
                    HistoricalSlippageStats::first(slippage_percent),
                );
            }
        }
    }

    fn snapshot(&self) -> HashMap<String, HistoricalSlippageStats> {
        self.stats.lock().unwrap().clone()
    }

    fn clear(&self) {
        self.stats.lock().unwrap().clear();
    }
}
