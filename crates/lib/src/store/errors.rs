//! Store error types for the fracindex persistence boundary.
//!
//! This module defines structured error types for store operations,
//! providing error context and type safety compared to string-based errors.

use thiserror::Error;

use crate::scope::{ItemId, Scope};

/// Errors that can occur at the scope store boundary.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional write matched no row: the item identity plus scope
    /// constraints did not select anything. Callers must treat this as
    /// "not found", never as silent success.
    #[error("Item not found: {item_id} in scope {scope}")]
    ItemNotFound {
        /// The identity that was targeted
        item_id: ItemId,
        /// The scope the write was constrained to
        scope: Scope,
    },

    /// An all-or-nothing batch write could not be applied. No partial
    /// effect is observable; the whole batch was rolled back.
    #[error("Batch write failed for scope {scope}: {reason}")]
    BatchWriteFailed {
        /// The scope the batch targeted
        scope: Scope,
        /// Description of the failure
        reason: String,
    },

    /// The underlying transactional store failed (connection loss,
    /// constraint violation). Propagated unchanged; retry policy belongs
    /// to the caller.
    #[error("Storage failure: {reason}")]
    StorageFailure {
        /// Description of the underlying failure
        reason: String,
    },
}

impl StoreError {
    /// Check if this error indicates a missing item.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::ItemNotFound { .. })
    }

    /// Check if this error is worth retrying at the caller's discretion.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::BatchWriteFailed { .. } | StoreError::StorageFailure { .. }
        )
    }
}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
