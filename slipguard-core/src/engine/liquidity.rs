//! Liquidity scoring: depth coverage, spread tightness, level count.

use crate::domain::{MarketSnapshot, Side};

/// Number of top-of-book levels counted toward depth coverage.
const COVERAGE_LEVELS: usize = 10;
/// Level count at which the depth component saturates.
const FULL_DEPTH_LEVELS: f64 = 20.0;

const COVERAGE_WEIGHT: f64 = 0.5;
const SPREAD_WEIGHT: f64 = 0.3;
const DEPTH_WEIGHT: f64 = 0.2;

/// Score the book's ability to absorb a trade, in [0, 1].
///
/// Weighted blend of:
/// - coverage: quantity available in the top 10 opposing levels vs requested
/// - spread: `max(0, 1 - spread_pct / 2)`, where a missing side or
///   non-positive midpoint counts as a 100% spread
/// - depth: opposing level count, saturating at 20
pub fn liquidity_score(snapshot: &MarketSnapshot, side: Side, quantity: f64) -> f64 {
    let levels = snapshot.levels_against(side);

    let available: f64 = levels
        .iter()
        .take(COVERAGE_LEVELS)
        .map(|l| l.quantity)
        .sum();
    let coverage = if quantity > 0.0 {
        (available / quantity).min(1.0)
    } else {
        1.0
    };

    let spread_percent = match (snapshot.best_bid(), snapshot.best_ask()) {
        (Some(bid), Some(ask)) => {
            let mid = (bid + ask) / 2.0;
            if mid <= 0.0 {
                100.0
            } else {
                (ask - bid) / mid * 100.0
            }
        }
        _ => 100.0,
    };
    let spread_score = (1.0 - spread_percent / 2.0).max(0.0);

    let depth_score = (levels.len() as f64 / FULL_DEPTH_LEVELS).min(1.0);

    (COVERAGE_WEIGHT * coverage + SPREAD_WEIGHT * spread_score + DEPTH_WEIGHT * depth_score)
        .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookLevel;

    fn deep_book() -> MarketSnapshot {
        let bids = (0..25)
            .map(|i| BookLevel::new(99.9 - i as f64 * 0.1, 10.0))
            .collect();
        let asks = (0..25)
            .map(|i| BookLevel::new(100.1 + i as f64 * 0.1, 10.0))
            .collect();
        MarketSnapshot::new("SPY", 100.0, bids, asks)
    }

    #[test]
    fn deep_tight_book_scores_near_one() {
        let snap = deep_book();
        let score = liquidity_score(&snap, Side::Buy, 5.0);
        // coverage 1.0, spread 0.2% → 0.9, depth 1.0
        assert!(score > 0.95, "score = {score}");
        assert!(score <= 1.0);
    }

    #[test]
    fn empty_opposing_side_scores_low() {
        let snap = MarketSnapshot::new("X", 100.0, vec![BookLevel::new(99.0, 1.0)], vec![]);
        let score = liquidity_score(&snap, Side::Buy, 5.0);
        // coverage 0, spread 0 (one-sided book), depth 0
        assert_eq!(score, 0.0);
    }

    #[test]
    fn oversized_request_reduces_coverage() {
        let snap = deep_book();
        let small = liquidity_score(&snap, Side::Buy, 10.0);
        let large = liquidity_score(&snap, Side::Buy, 1_000.0);
        assert!(large < small);
    }

    #[test]
    fn score_always_in_unit_interval() {
        let snap = deep_book();
        for qty in [0.001, 1.0, 100.0, 1e9] {
            let score = liquidity_score(&snap, Side::Sell, qty);
            assert!((0.0..=1.0).contains(&score));
        }
    }
}
