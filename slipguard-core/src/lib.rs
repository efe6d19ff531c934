//! SlipGuard Core — slippage estimation and protection engine.
//!
//! This crate contains the heart of the slippage protection system:
//! - Domain types (trade requests, book snapshots, estimates, reports, configs)
//! - Order-book walk that projects an execution price before a trade fires
//! - Liquidity scoring (depth coverage + spread tightness + level count)
//! - Protection layer: config precedence, allow/caution/reject decisions under
//!   a soft wall-clock budget, bounded report log, per-symbol history
//! - Order-size optimizer: binary search for the largest chunk that keeps
//!   slippage under a threshold
//!
//! Market data is an injected capability (`provider::MarketDepthProvider`);
//! the engine never fetches or retries on its own.

pub mod domain;
pub mod engine;
pub mod optimizer;
pub mod protection;
pub mod provider;

pub use domain::{
    BookLevel, ConfigError, DecisionRecommendation, MarketSnapshot, PriceRange,
    ProtectionDecision, Recommendation, Side, SlippageConfig, SlippageEstimate, SlippageReport,
    ToleranceLevel, TradeRequest,
};
pub use engine::{EstimateError, SlippageEstimator};
pub use optimizer::SplitRecommendation;
pub use protection::{ProtectionError, ReportFilter, SlippageProtection};
pub use provider::{DepthError, MarketDepthProvider, StaticDepthProvider};
