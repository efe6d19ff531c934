//! Historical statistics: per-symbol running averages and report aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running slippage statistics for one symbol.
///
/// Created lazily on the first history update, mutated only by updates, and
/// never expires implicitly (explicit clear only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSlippageStats {
    pub average_slippage_percent: f64,
    pub max_slippage_percent: f64,
    pub sample_count: u64,
    pub last_updated: DateTime<Utc>,
}

impl HistoricalSlippageStats {
    /// First observation for a symbol.
    pub fn first(slippage_percent: f64) -> Self {
        Self {
            average_slippage_percent: slippage_percent,
            max_slippage_percent: slippage_percent,
            sample_count: 1,
            last_updated: Utc::now(),
        }
    }

    /// Fold one more observation into the running average/max.
    pub fn absorb(&mut self, slippage_percent: f64) {
        let count = self.sample_count as f64;
        self.average_slippage_percent =
            (self.average_slippage_percent * count + slippage_percent) / (count + 1.0);
        self.max_slippage_percent = self.max_slippage_percent.max(slippage_percent);
        self.sample_count += 1;
        self.last_updated = Utc::now();
    }
}

/// Aggregate over the report log for one symbol and time window.
///
/// All-zero (the default) when no reports match — never an error.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SymbolStatistics {
    pub average_percent: f64,
    pub max_percent: f64,
    pub min_percent: f64,
    pub total_trades: u64,
    pub trades_exceeded: u64,
    pub total_cost: f64,
}
