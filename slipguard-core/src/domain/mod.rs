//! Domain types for SlipGuard.

pub mod config;
pub mod decision;
pub mod estimate;
pub mod report;
pub mod snapshot;
pub mod stats;
pub mod trade;

pub use config::{ConfigError, SlippageConfig, ToleranceLevel, UserSlippagePreference};
pub use decision::{DecisionRecommendation, ProtectionDecision};
pub use estimate::{PriceRange, RealizedSlippage, Recommendation, SlippageEstimate};
pub use report::SlippageReport;
pub use snapshot::{BookLevel, MarketSnapshot};
pub use stats::{HistoricalSlippageStats, SymbolStatistics};
pub use trade::{Side, TradeRequest};

/// Symbol type alias
pub type Symbol = String;
