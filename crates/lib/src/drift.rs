//! Drift detection: deciding when a computed position can no longer be
//! trusted and the scope must be renumbered.

use crate::Position;
use crate::constants::REBALANCE_THRESHOLD;

/// True when the fractional part of `position` carries more than
/// [`REBALANCE_THRESHOLD`] digits.
///
/// Successive midpoint bisections between the same neighbors add roughly one
/// fractional digit each. Past the threshold, another bisection risks
/// producing a value equal to one of its neighbors, so the caller must
/// rebalance the scope instead of persisting this position.
pub fn needs_rebalancing(position: &Position) -> bool {
    position.fraction_digits() > REBALANCE_THRESHOLD
}

/// True when both neighbor strings parse and `prev >= next`.
///
/// Neighbors arriving out of order mean the client computed them against a
/// stale view of the scope. A midpoint of such a pair would land the item
/// somewhere unrelated to what the user saw, so the mover rebalances instead.
/// If either side is absent or unparseable there is nothing to compare and
/// this returns false.
pub fn has_invalid_ordering(prev: Option<&str>, next: Option<&str>) -> bool {
    let prev = prev.and_then(Position::parse_lossy);
    let next = next.and_then(Position::parse_lossy);
    match (prev, next) {
        (Some(prev), Some(next)) => prev >= next,
        _ => false,
    }
}

/// True when `candidate` is the before-first sentinel produced for a
/// requested `next` neighbor at or below zero.
///
/// In that case the item is being placed before a first item that has no room
/// below it. The mover must pin that neighbor to `0` in a separate write
/// before persisting `candidate`, and reports the move as rebalanced. The
/// rule intentionally triggers only for `next <= 0`, not for arbitrarily
/// small negative neighbors further down a chain.
pub fn needs_first_item_reset(candidate: &Position, next: Option<&str>) -> bool {
    *candidate == Position::negative_increment()
        && next
            .and_then(Position::parse_lossy)
            .is_some_and(|next| next.is_at_most_zero())
}
