//! Shared fixtures for the integration suite.

use std::sync::Arc;

use fracindex::{Engine, ExtraFields, InMemory, ItemId, Position, Scope, Store};

pub fn pos(s: &str) -> Position {
    Position::parse_lossy(s).unwrap()
}

pub fn gear_scope(owner: &str, category: &str) -> Scope {
    Scope::new()
        .with("owner_id", owner)
        .with("category_id", category)
}

/// Engine and store with `ids` seeded at evenly spaced append positions.
pub async fn seeded_scope(scope: &Scope, ids: &[&str]) -> (Engine, Arc<InMemory>) {
    let store = Arc::new(InMemory::new());
    let engine = Engine::new(store.clone());
    for id in ids {
        let position = engine.next_append_position(scope).await.unwrap();
        store
            .insert_record(scope, *id, position, ExtraFields::new())
            .await;
    }
    (engine, store)
}

/// The scope's item ids in display order.
pub async fn ordered_ids(store: &InMemory, scope: &Scope) -> Vec<String> {
    store
        .fetch_ordered(scope, None)
        .await
        .unwrap()
        .iter()
        .map(|r| r.id.to_string())
        .collect()
}

/// The scope's positions in display order.
pub async fn ordered_positions(store: &InMemory, scope: &Scope) -> Vec<Position> {
    store
        .fetch_ordered(scope, None)
        .await
        .unwrap()
        .iter()
        .map(|r| r.position)
        .collect()
}

/// The current position of one item, as a wire string.
pub async fn position_of(store: &InMemory, id: &str) -> String {
    store
        .get(&ItemId::from(id))
        .await
        .unwrap()
        .position
        .to_string()
}
