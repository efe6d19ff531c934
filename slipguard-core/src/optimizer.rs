//! Order-size optimizer — find the largest chunk that stays under a slippage
//! threshold.
//!
//! Built only on the estimation engine's public `estimate`: the depth snapshot
//! is fetched once and every probe re-estimates against the same book, so the
//! search is deterministic for a given market view.

use crate::domain::{Side, TradeRequest};
use crate::protection::{ProtectionError, SlippageProtection};
use serde::{Deserialize, Serialize};

/// Smallest chunk considered, as a fraction of the total quantity.
const MIN_CHUNK_FRACTION: f64 = 0.1;
/// Search stops once the interval narrows to this fraction of the total.
const CONVERGENCE_FRACTION: f64 = 0.05;

/// Outcome of the chunk-size search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitRecommendation {
    pub should_split: bool,
    pub reason: String,
    /// Largest chunk found to stay within the threshold.
    pub recommended_chunk_size: Option<f64>,
    /// `ceil(total / chunk)` sequential orders.
    pub estimated_chunks: Option<u32>,
}

impl SlippageProtection {
    /// Decide whether a large order should be split, and into what size.
    ///
    /// If the full quantity's projected slippage is within the threshold no
    /// split is needed. Otherwise a binary search over `[0.1 * total, total]`
    /// finds the largest chunk whose projection stays within it; when even the
    /// smallest probe exceeds the threshold, the minimum chunk is recommended.
    pub fn should_split_order(
        &self,
        symbol: &str,
        side: Side,
        total_quantity: f64,
        max_slippage_percent: f64,
    ) -> Result<SplitRecommendation, ProtectionError> {
        let snapshot = self.provider().depth(symbol)?;
        let estimator = self.estimator();

        let full = TradeRequest::new(symbol, side, total_quantity);
        let full_estimate = estimator.estimate(&full, &snapshot)?;
        if full_estimate.estimated_slippage_percent <= max_slippage_percent {
            return Ok(SplitRecommendation {
                should_split: false,
                reason: format!(
                    "full order slippage {:.3}% within {:.3}% threshold",
                    full_estimate.estimated_slippage_percent, max_slippage_percent
                ),
                recommended_chunk_size: None,
                estimated_chunks: None,
            });
        }

        let mut low = total_quantity * MIN_CHUNK_FRACTION;
        let mut high = total_quantity;
        let mut best: Option<f64> = None;

        // Largest acceptable chunk: a passing midpoint raises the floor.
        while high - low > total_quantity * CONVERGENCE_FRACTION {
            let mid = (low + high) / 2.0;
            let probe = TradeRequest::new(symbol, side, mid);
            let estimate = estimator.estimate(&probe, &snapshot)?;
            if estimate.estimated_slippage_percent <= max_slippage_percent {
                best = Some(mid);
                low = mid;
            } else {
                high = mid;
            }
        }

        let chunk = best.unwrap_or(total_quantity * MIN_CHUNK_FRACTION);
        let chunks = (total_quantity / chunk).ceil() as u32;
        Ok(SplitRecommendation {
            should_split: true,
            reason: format!(
                "full order slippage {:.3}% exceeds {:.3}% threshold; execute {} chunks of at most {:.4}",
                full_estimate.estimated_slippage_percent, max_slippage_percent, chunks, chunk
            ),
            recommended_chunk_size: Some(chunk),
            estimated_chunks: Some(chunks),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookLevel, MarketSnapshot};
    use crate::provider::StaticDepthProvider;
    use std::sync::Arc;

    /// Book with steeply rising ask prices: big orders slip, small ones don't.
    fn sloped_provider() -> Arc<StaticDepthProvider> {
        let provider = StaticDepthProvider::new();
        let bids = (0..20)
            .map(|i| BookLevel::new(100.0 - 0.5 * (i + 1) as f64, 10.0))
            .collect();
        let asks = (0..20)
            .map(|i| BookLevel::new(100.0 + 0.5 * (i + 1) as f64, 10.0))
            .collect();
        provider.insert(MarketSnapshot::new("SLOPE/USD", 100.0, bids, asks));
        Arc::new(provider)
    }

    #[test]
    fn small_order_needs_no_split() {
        let protection = SlippageProtection::new(sloped_provider());
        let rec = protection
            .should_split_order("SLOPE/USD", Side::Buy, 5.0, 1.0)
            .unwrap();
        assert!(!rec.should_split);
        assert!(rec.recommended_chunk_size.is_none());
        assert!(rec.estimated_chunks.is_none());
    }

    #[test]
    fn large_order_gets_split_under_threshold() {
        let protection = SlippageProtection::new(sloped_provider());
        let total = 100.0;
        let threshold = 1.0;
        let rec = protection
            .should_split_order("SLOPE/USD", Side::Buy, total, threshold)
            .unwrap();

        assert!(rec.should_split);
        let chunk = rec.recommended_chunk_size.unwrap();
        assert!(chunk >= total * 0.1 && chunk < total);

        // The recommended chunk really does stay within the threshold.
        let snapshot = protection.provider().depth("SLOPE/USD").unwrap();
        let probe = TradeRequest::new("SLOPE/USD", Side::Buy, chunk);
        let estimate = protection.estimator().estimate(&probe, &snapshot).unwrap();
        assert!(estimate.estimated_slippage_percent <= threshold);

        let chunks = rec.estimated_chunks.unwrap();
        assert_eq!(chunks, (total / chunk).ceil() as u32);
    }

    #[test]
    fn hopeless_book_falls_back_to_minimum_chunk() {
        let provider = StaticDepthProvider::new();
        provider.insert(MarketSnapshot::new(
            "DRY/USD",
            100.0,
            vec![],
            vec![BookLevel::new(150.0, 0.001)],
        ));
        let protection = SlippageProtection::new(Arc::new(provider));

        let rec = protection
            .should_split_order("DRY/USD", Side::Buy, 10.0, 0.5)
            .unwrap();
        assert!(rec.should_split);
        assert!((rec.recommended_chunk_size.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(rec.estimated_chunks.unwrap(), 10);
    }
}
