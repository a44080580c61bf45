//! Constants used throughout the fracindex library.
//!
//! This module provides central definitions for the numeric parameters of the
//! indexing engine. Callers normally never need these directly, but they are
//! public so that store adapters and fixtures can reason about spacing.

/// Spacing between consecutive positions when appending or rebalancing.
///
/// New items land at `last + DEFAULT_INCREMENT`, and a rebalanced scope is
/// renumbered as `1000, 2000, 3000, ...`. The wide gap leaves room for many
/// midpoint insertions before any neighbor pair is exhausted.
pub const DEFAULT_INCREMENT: i64 = 1000;

/// Maximum number of fractional digits a position may carry before the scope
/// is rebalanced.
///
/// Each midpoint insertion between adjacent items can add one fractional
/// digit. Once a computed position exceeds this many digits, another bisection
/// risks producing a value that collides with a neighbor, so the engine
/// renumbers the whole scope instead.
pub const REBALANCE_THRESHOLD: u32 = 12;
