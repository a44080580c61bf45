//! In-memory store implementation.
//!
//! This module provides an in-memory implementation of the [`Store`] trait,
//! suitable for testing, development, or scenarios where data persistence is
//! not strictly required or is handled externally (e.g. by saving/loading the
//! entire state to/from a file).

use std::any::Any;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::Result;
use crate::position::Position;
use crate::scope::{ExtraFields, ItemId, ItemRecord, Scope};
use crate::store::Store;
use crate::store::errors::StoreError;

/// One persisted row: scope membership, position, and whatever else the
/// caller stored alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredItem {
    /// The sibling scope the row belongs to.
    pub scope: Scope,
    /// The row's position within its scope.
    pub position: Position,
    /// Opaque caller-owned columns.
    #[serde(default)]
    pub extra: ExtraFields,
}

/// A simple in-memory store backed by a `HashMap` behind an async `RwLock`.
///
/// Every mutating call takes the writer lock once and validates before it
/// mutates, so batches are observed all-or-nothing — a reader either sees a
/// scope fully renumbered or not at all.
///
/// Basic persistence is available via `save_to_file` / `load_from_file`,
/// serializing the map to JSON. Positions serialize as decimal strings, so
/// snapshots are portable across store implementations.
#[derive(Debug, Default)]
pub struct InMemory {
    items: RwLock<HashMap<ItemId, StoredItem>>,
}

impl InMemory {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row with a known identity. Intended for fixtures and for
    /// adapters seeding state; position calculation is the engine's job.
    pub async fn insert_record(
        &self,
        scope: &Scope,
        id: impl Into<ItemId>,
        position: Position,
        extra: ExtraFields,
    ) {
        let id = id.into();
        let mut items = self.items.write().await;
        items.insert(
            id,
            StoredItem {
                scope: scope.clone(),
                position,
                extra,
            },
        );
    }

    /// Inserts a row with a generated UUIDv4 identity and returns it.
    pub async fn insert_generated(
        &self,
        scope: &Scope,
        position: Position,
        extra: ExtraFields,
    ) -> ItemId {
        let id = ItemId::new(Uuid::new_v4().to_string());
        self.insert_record(scope, id.clone(), position, extra).await;
        id
    }

    /// Returns a copy of one row, if present.
    pub async fn get(&self, id: &ItemId) -> Option<StoredItem> {
        self.items.read().await.get(id).cloned()
    }

    /// Number of rows across all scopes.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// True when the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Saves the full store state to a JSON file.
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let items = self.items.read().await.clone();
        let json = serde_json::to_string_pretty(&items)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads store state from a JSON file produced by `save_to_file`.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let items: HashMap<ItemId, StoredItem> = serde_json::from_str(&json)?;
        Ok(Self {
            items: RwLock::new(items),
        })
    }
}

/// Renders an extra-field value as a scope constraint value.
///
/// Scope columns are plain strings; JSON strings are used verbatim and any
/// other value type falls back to its JSON rendering.
fn constraint_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl Store for InMemory {
    async fn fetch_ordered(
        &self,
        scope: &Scope,
        exclude: Option<&ItemId>,
    ) -> Result<Vec<ItemRecord>> {
        let items = self.items.read().await;
        let mut rows: Vec<ItemRecord> = items
            .iter()
            .filter(|&(id, item)| item.scope.matches(scope) && Some(id) != exclude)
            .map(|(id, item)| ItemRecord {
                id: id.clone(),
                position: item.position,
            })
            .collect();
        // Numeric position order; identity as a deterministic tie-break.
        rows.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn max_position(&self, scope: &Scope) -> Result<Option<Position>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| item.scope.matches(scope))
            .map(|item| item.position)
            .max())
    }

    async fn update_position(
        &self,
        scope: &Scope,
        item_id: &ItemId,
        position: &Position,
        extra: &ExtraFields,
    ) -> Result<()> {
        let mut items = self.items.write().await;
        let Some(item) = items
            .get_mut(item_id)
            .filter(|item| item.scope.matches(scope))
        else {
            return Err(StoreError::ItemNotFound {
                item_id: item_id.clone(),
                scope: scope.clone(),
            }
            .into());
        };

        item.position = *position;
        for (key, value) in extra {
            if item.scope.constrains(key) {
                // Extra fields naming a scope column retarget the row.
                item.scope.set(key, constraint_value(value));
            } else {
                item.extra.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn write_positions(
        &self,
        scope: &Scope,
        assignments: &[(ItemId, Position)],
    ) -> Result<()> {
        let mut items = self.items.write().await;

        // Validate the whole batch before touching anything so a failure
        // leaves no partial effect.
        for (id, _) in assignments {
            let matches = items
                .get(id)
                .is_some_and(|item| item.scope.matches(scope));
            if !matches {
                return Err(StoreError::BatchWriteFailed {
                    scope: scope.clone(),
                    reason: format!("no row for item {id}"),
                }
                .into());
            }
        }

        for (id, position) in assignments {
            if let Some(item) = items.get_mut(id) {
                item.position = *position;
            }
        }
        Ok(())
    }

    async fn upsert_relocated(
        &self,
        target_scope: &Scope,
        rows: &[(ItemId, Position)],
    ) -> Result<()> {
        let mut items = self.items.write().await;
        for (id, position) in rows {
            match items.get_mut(id) {
                Some(item) => {
                    // Merge: only scope and position are overwritten.
                    item.scope = target_scope.clone();
                    item.position = *position;
                }
                None => {
                    items.insert(
                        id.clone(),
                        StoredItem {
                            scope: target_scope.clone(),
                            position: *position,
                            extra: ExtraFields::new(),
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
