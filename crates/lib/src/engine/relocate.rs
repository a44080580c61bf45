//! Bulk relocation: moving an ordered batch of items into another scope.

use tracing::debug;

use crate::position::Position;
use crate::scope::{ItemId, Scope};
use crate::{Result, index};

use super::Engine;

impl Engine {
    /// Moves `items` into `target_scope` as one contiguous block.
    ///
    /// The items must already be in the relative order the caller wants to
    /// preserve. Each receives the next value of an evenly spaced sequence
    /// starting at `start` (default increment when absent), and all rows are
    /// written in one atomic insert-or-update batch — only scope and position
    /// columns are overwritten, other columns survive.
    ///
    /// Typical use: a parent container was deleted and its children are
    /// pushed into a fallback scope after whatever already sits there, with
    /// `start` taken from [`Engine::next_append_position`].
    ///
    /// Empty input is a no-op.
    pub async fn bulk_relocate(
        &self,
        items: &[ItemId],
        target_scope: &Scope,
        start: Option<Position>,
    ) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }

        let sequence = index::generate_sequence(items.len() as i64, start, None);
        let rows: Vec<(ItemId, Position)> = items.iter().cloned().zip(sequence).collect();

        self.store.upsert_relocated(target_scope, &rows).await?;
        debug!(scope = %target_scope, moved = items.len(), "items relocated");
        Ok(())
    }
}
