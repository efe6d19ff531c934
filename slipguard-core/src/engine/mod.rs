//! Slippage estimation engine — pure computation over a snapshot and request.
//!
//! The engine walks the opposing side of the book to project an execution
//! price, scores liquidity, blends in per-symbol history for the price range,
//! and maps the result to a proceed/caution/delay recommendation. The only
//! state it touches is the injected history store.

pub mod book_walk;
pub mod estimator;
pub mod history;
pub mod liquidity;
pub mod tolerance;

pub use book_walk::project_execution_price;
pub use estimator::{calculate_actual_slippage, EstimateError, SlippageEstimator};
pub use history::{HistoryStore, InMemoryHistoryStore};
pub use liquidity::liquidity_score;
pub use tolerance::{dynamic_tolerance, tolerance_for_level};
