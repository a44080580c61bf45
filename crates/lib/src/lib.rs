//!
//! Fracindex: stable fractional-index ordering for sibling-scoped lists.
//!
//! Items within a sibling list (items in a category, categories in a pack)
//! keep a persistent, comparable [`Position`] instead of a dense integer
//! rank, so a drag-and-drop reorder rewrites one row rather than every
//! sibling.
//!
//! ## Core Concepts
//!
//! * **Positions (`position::Position`)**: exact decimal values, serialized
//!   as strings, ordered numerically. New positions come from midpoints of
//!   their neighbors.
//! * **Scopes (`scope::Scope`)**: equality constraints identifying one
//!   sibling list. Positions are only comparable within a scope.
//! * **Stores (`store::Store`)**: the pluggable persistence boundary — an
//!   adapter over a transactional row store with atomic conditional writes
//!   and all-or-nothing batches.
//! * **Engine (`engine::Engine`)**: the mover/rebalancer/relocator
//!   orchestration over an injected store.
//! * **Drift (`drift`)**: midpoint chains slowly grow fractional digits;
//!   once a position passes the precision threshold the engine renumbers the
//!   whole scope in one atomic batch.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use fracindex::{Engine, ExtraFields, InMemory, Position, Scope};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = Arc::new(InMemory::new());
//! let engine = Engine::new(store.clone());
//! let scope = Scope::new().with("owner_id", "u1").with("category_id", "c1");
//!
//! let first = engine.next_append_position(&scope).await?;
//! assert_eq!(first.to_string(), "1000");
//! let id = store.insert_generated(&scope, first, ExtraFields::new()).await;
//!
//! // Move the item to the front of the scope (no previous neighbor).
//! let result = engine
//!     .move_item(&scope, &id, None, Some("1000"), &ExtraFields::new())
//!     .await?;
//! assert_eq!(result.position.to_string(), "500");
//! # Ok::<(), fracindex::Error>(())
//! # }).unwrap();
//! ```

pub mod constants;
pub mod drift;
pub mod engine;
pub mod index;
pub mod position;
pub mod scope;
pub mod store;

pub use engine::{Engine, MoveResult};
pub use position::Position;
pub use scope::{ExtraFields, ItemId, ItemRecord, Scope};
pub use store::{InMemory, Store};

/// Result type used throughout the fracindex library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the fracindex library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured errors from the store boundary
    #[error(transparent)]
    Store(store::errors::StoreError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
            Error::Store(_) => "store",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is store/persistence-related.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// Check if this error is worth retrying at the caller's discretion.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_transient(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
