//! Book walk: project the volume-weighted execution price of a market order.

use crate::domain::BookLevel;

/// Price multiplier for quantity beyond the visible book. The unfilled
/// remainder is assumed to execute 2% past the worst visible level.
pub const EXHAUSTED_BOOK_PENALTY: f64 = 1.02;

/// Walk priority-sorted levels and return the volume-weighted average price
/// for filling `quantity`.
///
/// Levels are consumed best-first, `min(remaining, level.quantity)` at each.
/// If the book runs out, the remainder is extrapolated at the penalty price.
/// Returns 0.0 when nothing can be filled at all (empty book).
pub fn project_execution_price(levels: &[BookLevel], quantity: f64) -> f64 {
    let mut remaining = quantity;
    let mut filled = 0.0;
    let mut cost = 0.0;

    for level in levels {
        if remaining <= 0.0 {
            break;
        }
        let fill = remaining.min(level.quantity);
        cost += fill * level.price;
        filled += fill;
        remaining -= fill;
    }

    if remaining > 0.0 {
        if let Some(worst) = levels.last() {
            cost += remaining * worst.price * EXHAUSTED_BOOK_PENALTY;
            filled += remaining;
        }
    }

    if filled > 0.0 {
        cost / filled
    } else {
        0.0
    }
}
