//! Pure index arithmetic: computing a new position from its neighbors.
//!
//! Nothing in this module performs I/O or fails. Malformed neighbor strings
//! degrade to [`DEFAULT_INCREMENT`](crate::constants::DEFAULT_INCREMENT)
//! defaults, keeping the engine resilient to stale client state.

use crate::Position;

/// Position to append after the current maximum of a scope.
///
/// Returns `last + 1000`, or `1000` for an empty scope.
pub fn append(last: Option<&Position>) -> Position {
    match last {
        Some(last) => *last + Position::default_increment(),
        None => Position::default_increment(),
    }
}

/// Computes the position between two requested neighbors.
///
/// Inputs are raw wire strings: branch selection is by *presence*, and a
/// string that fails to parse degrades to the default increment within its
/// branch rather than producing an error.
///
/// - both absent: `1000` (first item in an empty scope)
/// - only `next`: `next / 2`, except that `next <= 0` yields the `-1000`
///   sentinel — the caller must pin the existing first item to `0` before
///   persisting (see the mover)
/// - only `prev`: `prev + 1000`
/// - both: `(prev + next) / 2`
pub fn midpoint(prev: Option<&str>, next: Option<&str>) -> Position {
    match (prev, next) {
        (None, None) => Position::default_increment(),
        (None, Some(next)) => match Position::parse_lossy(next) {
            Some(next) if next.is_at_most_zero() => Position::negative_increment(),
            Some(next) => next.halve(),
            None => Position::default_increment(),
        },
        (Some(prev), None) => match Position::parse_lossy(prev) {
            Some(prev) => append(Some(&prev)),
            None => Position::default_increment(),
        },
        (Some(prev), Some(next)) => {
            match (Position::parse_lossy(prev), Position::parse_lossy(next)) {
                (Some(prev), Some(next)) => prev.midpoint_with(&next),
                _ => Position::default_increment(),
            }
        }
    }
}

/// Produces `count` evenly spaced positions: `start, start+gap, start+2*gap, ...`
///
/// Used by the rebalancer (`generate_sequence(n, None, None)` renumbers a
/// scope as `1000, 2000, ...`) and the bulk relocator. A non-positive `gap`
/// silently falls back to the default `(start=1000, gap=1000)` layout; a
/// non-positive `count` returns an empty sequence.
pub fn generate_sequence(count: i64, start: Option<Position>, gap: Option<Position>) -> Vec<Position> {
    if count <= 0 {
        return Vec::new();
    }

    let (start, gap) = match gap {
        Some(gap) if !gap.is_at_most_zero() => (
            start.unwrap_or_else(Position::default_increment),
            gap,
        ),
        Some(_) => (
            Position::default_increment(),
            Position::default_increment(),
        ),
        None => (
            start.unwrap_or_else(Position::default_increment),
            Position::default_increment(),
        ),
    };

    let mut sequence = Vec::with_capacity(count as usize);
    let mut current = start;
    for _ in 0..count {
        sequence.push(current);
        current = current + gap;
    }
    sequence
}
