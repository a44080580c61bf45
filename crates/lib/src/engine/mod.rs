//! The indexing engine: mover, rebalancer, and bulk relocator.
//!
//! [`Engine`] is the entry point callers use to reposition items. It owns a
//! shared handle to a [`Store`] — the store is an explicit injected
//! capability, never a process-wide singleton, so the engine is testable
//! against an in-memory store and multiple engines can target different
//! stores concurrently.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::position::Position;
use crate::scope::{ExtraFields, ItemId, Scope};
use crate::store::Store;
use crate::{Result, drift, index};

mod rebalance;
mod relocate;


/// Outcome of a single move: the persisted position and whether the call had
/// to renumber anything beyond the moved item itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// The position the item now holds.
    pub position: Position,
    /// True when the move rebalanced the scope, or pinned the previous first
    /// item to zero to make room below it.
    pub rebalanced: bool,
}

/// Orchestrates position calculation and atomic persistence.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn Store>,
}

impl Engine {
    /// Creates an engine over the given store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// The store this engine persists through.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Position for a new item appended to the end of `scope`.
    ///
    /// Fetches the scope's current maximum and steps past it; an empty scope
    /// starts at the default increment.
    pub async fn next_append_position(&self, scope: &Scope) -> Result<Position> {
        let max = self.store.max_position(scope).await?;
        Ok(index::append(max.as_ref()))
    }

    /// Repositions one item between two requested neighbors.
    ///
    /// `prev` and `next` are the neighbor positions as the client saw them,
    /// in wire (string) form; either may be absent for a move to the start or
    /// end of the scope. `extra` is persisted in the same atomic write.
    ///
    /// The happy path computes the midpoint of the neighbors and persists it.
    /// Three conditions divert from it:
    ///
    /// - neighbors out of order (`prev >= next`, stale client state): the
    ///   scope is rebalanced with the item placed last,
    /// - the midpoint has drifted past the precision threshold: same
    ///   rebalance path,
    /// - the item lands before a first item sitting at or below zero: that
    ///   neighbor is pinned to `0` in a separate single-row write first.
    ///
    /// After a successful return, re-reading the scope ordered by position
    /// shows the item between the rows that held `prev` and `next` — or, if
    /// rebalanced, in an evenly spaced order with the item last.
    ///
    /// # Errors
    /// [`StoreError::ItemNotFound`](crate::store::errors::StoreError::ItemNotFound)
    /// when `item_id` does not exist inside `scope`; store failures propagate
    /// unchanged.
    pub async fn move_item(
        &self,
        scope: &Scope,
        item_id: &ItemId,
        prev: Option<&str>,
        next: Option<&str>,
        extra: &ExtraFields,
    ) -> Result<MoveResult> {
        if drift::has_invalid_ordering(prev, next) {
            warn!(%item_id, %scope, ?prev, ?next, "neighbor positions out of order, rebalancing");
            return self.rebalance_and_place(scope, item_id, extra).await;
        }

        let candidate = index::midpoint(prev, next);

        if drift::needs_rebalancing(&candidate) {
            warn!(%item_id, %scope, position = %candidate, "position drifted past threshold, rebalancing");
            return self.rebalance_and_place(scope, item_id, extra).await;
        }

        let mut rebalanced = false;
        if drift::needs_first_item_reset(&candidate, next) {
            self.reset_first_item(scope, item_id, next).await?;
            rebalanced = true;
        }

        self.store
            .update_position(scope, item_id, &candidate, extra)
            .await?;
        debug!(%item_id, %scope, position = %candidate, rebalanced, "item moved");

        Ok(MoveResult {
            position: candidate,
            rebalanced,
        })
    }

    /// Rebalances `scope` around `item_id` and persists the item at the
    /// returned end-of-scope position.
    async fn rebalance_and_place(
        &self,
        scope: &Scope,
        item_id: &ItemId,
        extra: &ExtraFields,
    ) -> Result<MoveResult> {
        let position = self.rebalance(scope, Some(item_id)).await?;
        self.store
            .update_position(scope, item_id, &position, extra)
            .await?;
        Ok(MoveResult {
            position,
            rebalanced: true,
        })
    }

    /// Pins the scope's current first item to zero so the moving item can
    /// take the before-first sentinel position below it.
    ///
    /// The row holding the requested `next` position is preferred; if the
    /// client's view was stale and no row holds it, the actual first row is
    /// pinned instead.
    async fn reset_first_item(
        &self,
        scope: &Scope,
        moving: &ItemId,
        next: Option<&str>,
    ) -> Result<()> {
        let requested = next.and_then(Position::parse_lossy);
        let rows = self.store.fetch_ordered(scope, Some(moving)).await?;
        let neighbor = rows
            .iter()
            .find(|row| Some(row.position) == requested)
            .or_else(|| rows.first());

        if let Some(neighbor) = neighbor {
            debug!(item_id = %neighbor.id, %scope, "pinning first item to zero");
            self.store
                .update_position(scope, &neighbor.id, &Position::ZERO, &ExtraFields::new())
                .await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}
