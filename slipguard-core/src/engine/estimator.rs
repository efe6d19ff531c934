//! The estimator: book walk + liquidity score + history blend → estimate.

use crate::domain::{
    HistoricalSlippageStats, MarketSnapshot, PriceRange, RealizedSlippage, Recommendation,
    SlippageEstimate, TradeRequest,
};
use crate::engine::book_walk::project_execution_price;
use crate::engine::history::{HistoryStore, InMemoryHistoryStore};
use crate::engine::liquidity::liquidity_score;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Slippage percent above which the engine recommends delaying.
const DELAY_SLIPPAGE_PERCENT: f64 = 2.0;
/// Liquidity score below which the engine recommends delaying.
const DELAY_LIQUIDITY_SCORE: f64 = 0.3;
/// Slippage percent above which the engine recommends caution.
const CAUTION_SLIPPAGE_PERCENT: f64 = 0.5;
/// Liquidity score below which the engine recommends caution.
const CAUTION_LIQUIDITY_SCORE: f64 = 0.6;

/// Safety margin applied when deriving the expected price range.
const PRICE_RANGE_MARGIN: f64 = 1.2;

/// Invalid-input conditions. No estimate is produced when these fire.
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("reference price must be positive (got {0})")]
    NonPositiveReferencePrice(f64),

    #[error("expected price must be positive (got {0})")]
    NonPositiveExpectedPrice(f64),

    #[error("quantity must be positive (got {0})")]
    NonPositiveQuantity(f64),
}

/// Realized slippage of an executed trade, measured against the expected price.
///
/// `amount = |actual - expected|`, `percent = amount / expected * 100`,
/// `total_cost = amount * quantity`.
pub fn calculate_actual_slippage(
    expected_price: f64,
    actual_price: f64,
    quantity: f64,
) -> Result<RealizedSlippage, EstimateError> {
    if expected_price <= 0.0 {
        return Err(EstimateError::NonPositiveExpectedPrice(expected_price));
    }
    let amount = (actual_price - expected_price).abs();
    Ok(RealizedSlippage {
        amount,
        percent: amount / expected_price * 100.0,
        total_cost: amount * quantity,
    })
}

/// Slippage estimator. Pure given its inputs, except that it reads the
/// per-symbol history store to widen the projected price range.
pub struct SlippageEstimator {
    history: Arc<dyn HistoryStore>,
}

impl Default for SlippageEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl SlippageEstimator {
    /// Estimator backed by a fresh in-memory history store.
    pub fn new() -> Self {
        Self {
            history: Arc::new(InMemoryHistoryStore::new()),
        }
    }

    /// Estimator over an injected (possibly shared) history store.
    pub fn with_history(history: Arc<dyn HistoryStore>) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// Record a realized slippage observation for the symbol.
    pub fn update_history(&self, symbol: &str, slippage_percent: f64) {
        self.history.update(symbol, slippage_percent);
    }

    pub fn historical_stats(&self, symbol: &str) -> Option<HistoricalSlippageStats> {
        self.history.get(symbol)
    }

    /// Project the slippage of executing `request` against `snapshot`.
    ///
    /// Reference price is the request's expected price when present, else the
    /// snapshot's current price; a non-positive reference or quantity is an
    /// invalid-input error.
    pub fn estimate(
        &self,
        request: &TradeRequest,
        snapshot: &MarketSnapshot,
    ) -> Result<SlippageEstimate, EstimateError> {
        if request.quantity <= 0.0 {
            return Err(EstimateError::NonPositiveQuantity(request.quantity));
        }
        let reference_price = request.expected_price.unwrap_or(snapshot.current_price);
        if reference_price <= 0.0 {
            return Err(EstimateError::NonPositiveReferencePrice(reference_price));
        }

        let levels = snapshot.levels_against(request.side);
        let execution_price = project_execution_price(levels, request.quantity);

        let slippage_amount = (execution_price - reference_price).abs();
        let slippage_percent = slippage_amount / reference_price * 100.0;

        let score = liquidity_score(snapshot, request.side, request.quantity);

        // Price range: the wider of projected and historical slippage, with margin.
        let historical_average = self
            .history
            .get(&request.symbol)
            .map(|s| s.average_slippage_percent)
            .unwrap_or(0.0);
        let range_percent = slippage_percent.max(historical_average) * PRICE_RANGE_MARGIN;
        let price_range = PriceRange {
            min: reference_price * (1.0 - range_percent / 100.0),
            max: reference_price * (1.0 + range_percent / 100.0),
        };

        let mut reasons = Vec::new();
        if slippage_percent > DELAY_SLIPPAGE_PERCENT {
            reasons.push(format!(
                "projected slippage {slippage_percent:.3}% exceeds {DELAY_SLIPPAGE_PERCENT:.1}%"
            ));
        }
        if score < DELAY_LIQUIDITY_SCORE {
            reasons.push(format!(
                "liquidity score {score:.2} below {DELAY_LIQUIDITY_SCORE:.1}"
            ));
        }
        let must_delay = !reasons.is_empty();
        if !must_delay {
            if slippage_percent > CAUTION_SLIPPAGE_PERCENT {
                reasons.push(format!(
                    "projected slippage {slippage_percent:.3}% exceeds {CAUTION_SLIPPAGE_PERCENT:.1}%"
                ));
            }
            if score < CAUTION_LIQUIDITY_SCORE {
                reasons.push(format!(
                    "liquidity score {score:.2} below {CAUTION_LIQUIDITY_SCORE:.1}"
                ));
            }
        }
        let recommendation = if must_delay {
            Recommendation::Delay
        } else if reasons.is_empty() {
            Recommendation::Proceed
        } else {
            Recommendation::Caution
        };
        let reasoning = if reasons.is_empty() {
            "market conditions favorable for execution".to_string()
        } else {
            reasons.join("; ")
        };

        debug!(
            symbol = %request.symbol,
            side = %request.side,
            quantity = request.quantity,
            slippage_percent,
            liquidity = score,
            ?recommendation,
            "slippage estimate"
        );

        Ok(SlippageEstimate {
            estimated_slippage_percent: slippage_percent,
            estimated_slippage_amount: slippage_amount,
            execution_price,
            current_market_price: reference_price,
            price_range,
            liquidity_score: score,
            recommendation,
            reasoning,
        })
    }
}
