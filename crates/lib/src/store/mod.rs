//! Store implementations for fracindex persistence.
//!
//! This module provides the core [`Store`] trait and the in-memory reference
//! implementation. The `Store` trait is the persistence boundary of the
//! engine: given a [`Scope`] it fetches and updates rows ordered by position,
//! and every mutating call is atomic — concurrent readers never observe a
//! scope mid-rebalance.

use std::any::Any;

use async_trait::async_trait;

use crate::Result;
use crate::position::Position;
use crate::scope::{ExtraFields, ItemId, ItemRecord, Scope};

pub mod errors;
mod in_memory;

pub use in_memory::{InMemory, StoredItem};

/// The persistence boundary the indexing engine writes through.
///
/// Implementations adapt a transactional row store: a `Scope` is a set of
/// equality constraints selecting sibling rows, and the position column is
/// ordered *numerically* (parse/cast), never lexicographically — otherwise
/// `"900"` sorts after `"1000"` and ordering breaks.
///
/// All implementations must be `Send` and `Sync` to allow sharing across
/// tasks, and implement `Any` to allow for downcasting if needed.
///
/// # Atomicity
///
/// Each method is one atomic unit. `update_position` must compare identity
/// and scope constraints in the same statement as the mutation, so a move can
/// never write to an item outside its scope. `write_positions` and
/// `upsert_relocated` are all-or-nothing: if the underlying store cannot
/// guarantee that, the implementation must wrap the batch in an explicit
/// transaction. Cancellation before commit leaves the store unchanged.
#[async_trait]
pub trait Store: Send + Sync + Any {
    /// Fetches all items in `scope`, ordered by position ascending
    /// (numeric order), optionally excluding one item that is mid-move.
    ///
    /// # Returns
    /// The scope's rows as `(id, position)` records in display order.
    async fn fetch_ordered(
        &self,
        scope: &Scope,
        exclude: Option<&ItemId>,
    ) -> Result<Vec<ItemRecord>>;

    /// Returns the maximum position currently used in `scope`, or `None`
    /// for an empty scope.
    async fn max_position(&self, scope: &Scope) -> Result<Option<Position>>;

    /// Atomically sets one item's position, conditional on the item matching
    /// both `item_id` and every constraint in `scope`.
    ///
    /// `extra` is persisted in the same write: keys naming one of the row's
    /// scope constraint columns retarget that column (cross-list moves),
    /// everything else is stored on the row as-is.
    ///
    /// # Errors
    /// [`StoreError::ItemNotFound`](errors::StoreError::ItemNotFound) when
    /// the conditional write affects zero rows.
    async fn update_position(
        &self,
        scope: &Scope,
        item_id: &ItemId,
        position: &Position,
        extra: &ExtraFields,
    ) -> Result<()>;

    /// Atomically rewrites the position column for every listed item in
    /// `scope`, keyed by item identity. No other columns are touched.
    ///
    /// # Errors
    /// Fails without partial effect if any assignment does not match an
    /// existing row in `scope`.
    async fn write_positions(
        &self,
        scope: &Scope,
        assignments: &[(ItemId, Position)],
    ) -> Result<()>;

    /// Batch insert-or-update by item identity, moving each row into
    /// `target_scope` at its assigned position.
    ///
    /// Only the scope columns and the position are overwritten; all other
    /// columns of an existing row survive untouched. Rows that do not exist
    /// yet are created. All-or-nothing.
    async fn upsert_relocated(
        &self,
        target_scope: &Scope,
        rows: &[(ItemId, Position)],
    ) -> Result<()>;

    /// Returns a reference to the store instance as a dynamic `Any` type.
    ///
    /// This allows for downcasting to a concrete store implementation if
    /// necessary. Use with caution.
    fn as_any(&self) -> &dyn Any;
}
