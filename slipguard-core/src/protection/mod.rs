//! Protection & policy layer — turns estimates into decisions and keeps the
//! records that let limits adapt over time.
//!
//! Responsibilities:
//! - Resolve the effective config (override > user symbol override > user
//!   default > system default)
//! - Validate trades against the (possibly dynamically widened) limit under a
//!   soft wall-clock budget — the budget is logged when near exhaustion, never
//!   enforced by cancellation
//! - Record realized slippage as immutable reports in a bounded FIFO log and
//!   feed the per-symbol history
//! - Answer report/statistics queries and export bundles

pub mod policy;
pub mod preferences;
pub mod query;
pub mod report_log;

pub use policy::SlippageProtection;
pub use preferences::{InMemoryPreferenceStore, PreferenceStore};
pub use query::{ExportBundle, ReportFilter};
pub use report_log::{BoundedReportLog, ReportLog, DEFAULT_REPORT_CAPACITY};

use crate::domain::ConfigError;
use crate::engine::EstimateError;
use crate::provider::DepthError;
use thiserror::Error;

/// Errors from protection-layer operations.
///
/// Soft-deadline overruns are deliberately absent: they are logged, never
/// raised (see `policy`).
#[derive(Debug, Error)]
pub enum ProtectionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Estimate(#[from] EstimateError),

    #[error(transparent)]
    Depth(#[from] DepthError),
}
