//! Scope rebalancing: renumbering all siblings with even spacing.

use tracing::debug;

use crate::position::Position;
use crate::scope::{ItemId, Scope};
use crate::{Result, index};

use super::Engine;

impl Engine {
    /// Renumbers every member of `scope` with evenly spaced positions and
    /// returns the safe position for the excluded item to take.
    ///
    /// Members are read in their current numeric order (excluding `exclude`
    /// if given), assigned `1000, 2000, 3000, ...` in that order through one
    /// atomic batch write, and the returned position is one increment past
    /// the last assignment — the excluded item is conceptually placed at the
    /// end. A scope with no other members yields the default increment.
    ///
    /// Rebalancing the same scope twice in a row produces the same position
    /// set both times.
    ///
    /// # Errors
    /// If the batch write fails the whole rebalance aborts with no partial
    /// effect; the store error propagates to the caller.
    pub async fn rebalance(&self, scope: &Scope, exclude: Option<&ItemId>) -> Result<Position> {
        let rows = self.store.fetch_ordered(scope, exclude).await?;
        if rows.is_empty() {
            return Ok(Position::default_increment());
        }

        let sequence = index::generate_sequence(rows.len() as i64, None, None);
        let assignments: Vec<(ItemId, Position)> = rows
            .iter()
            .zip(sequence.iter())
            .map(|(row, position)| (row.id.clone(), *position))
            .collect();

        self.store.write_positions(scope, &assignments).await?;

        let Some(last) = sequence.last() else {
            return Ok(Position::default_increment());
        };
        let next = index::append(Some(last));
        debug!(%scope, members = rows.len(), next = %next, "scope rebalanced");
        Ok(next)
    }
}
