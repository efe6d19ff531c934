//! Slippage configuration and per-user preference profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Bounds for `SlippageConfig::max_execution_time_ms`.
pub const MIN_EXECUTION_TIME_MS: u64 = 100;
pub const MAX_EXECUTION_TIME_MS: u64 = 30_000;

/// Named tolerance preset, each mapping to a fixed max-slippage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToleranceLevel {
    Strict,
    Moderate,
    Relaxed,
}

/// Errors from configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_slippage_percent {0} out of range [0, 100]")]
    SlippageOutOfRange(f64),

    #[error("max_execution_time_ms {0} out of range [{MIN_EXECUTION_TIME_MS}, {MAX_EXECUTION_TIME_MS}]")]
    ExecutionBudgetOutOfRange(u64),
}

/// One slippage policy: limit, tolerance preset, dynamic adjustment, budget.
///
/// Validated on every write; a stored config always satisfies its ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlippageConfig {
    /// Maximum tolerated slippage, percent units, in [0, 100].
    pub max_slippage_percent: f64,
    pub tolerance_level: ToleranceLevel,
    /// When set, the limit is widened under low liquidity / high volatility
    /// (capped at 3x) before the decision is made.
    pub enable_dynamic_slippage: bool,
    /// Soft wall-clock budget for one validation call, in [100, 30000] ms.
    pub max_execution_time_ms: u64,
}

impl Default for SlippageConfig {
    /// System default: 0.5% limit, moderate preset, dynamic on, 5s budget.
    fn default() -> Self {
        Self {
            max_slippage_percent: 0.5,
            tolerance_level: ToleranceLevel::Moderate,
            enable_dynamic_slippage: true,
            max_execution_time_ms: 5_000,
        }
    }
}

impl SlippageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // NaN fails the range check too
        if !(0.0..=100.0).contains(&self.max_slippage_percent) {
            return Err(ConfigError::SlippageOutOfRange(self.max_slippage_percent));
        }
        if !(MIN_EXECUTION_TIME_MS..=MAX_EXECUTION_TIME_MS).contains(&self.max_execution_time_ms) {
            return Err(ConfigError::ExecutionBudgetOutOfRange(
                self.max_execution_time_ms,
            ));
        }
        Ok(())
    }

    pub fn execution_budget(&self) -> Duration {
        Duration::from_millis(self.max_execution_time_ms)
    }
}

/// Per-user slippage preferences: a default config plus per-symbol overrides.
///
/// One record per user, created on first preference write and overwritten in
/// place thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSlippagePreference {
    pub user_id: String,
    pub default_config: SlippageConfig,
    pub symbol_overrides: HashMap<String, SlippageConfig>,
    pub last_updated: DateTime<Utc>,
}

impl UserSlippagePreference {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            default_config: SlippageConfig::default(),
            symbol_overrides: HashMap::new(),
            last_updated: Utc::now(),
        }
    }

    /// Config applying to the given symbol: the symbol override if present,
    /// otherwise the user's default.
    pub fn config_for(&self, symbol: &str) -> &SlippageConfig {
        self.symbol_overrides
            .get(symbol)
            .unwrap_or(&self.default_config)
    }
}
