//! End-to-end engine scenarios against the in-memory store.

use std::sync::Arc;

use fracindex::{Engine, ExtraFields, InMemory, ItemId};

use crate::helpers::{gear_scope, ordered_ids, ordered_positions, pos, position_of, seeded_scope};

#[tokio::test]
async fn append_then_insert_between_uses_live_neighbors() {
    // The §8-style scenario: build a list by appending, then move an item
    // between two live rows. The mover computes against the positions the
    // caller supplies, which reflect the current scope, so no collision.
    let scope = gear_scope("u1", "c1");
    let (engine, store) = seeded_scope(&scope, &[]).await;

    let first = engine.next_append_position(&scope).await.unwrap();
    assert_eq!(first.to_string(), "1000");
    store
        .insert_record(&scope, "tent", first, ExtraFields::new())
        .await;

    let second = engine.next_append_position(&scope).await.unwrap();
    assert_eq!(second.to_string(), "2000");
    store
        .insert_record(&scope, "stove", second, ExtraFields::new())
        .await;

    let third = engine.next_append_position(&scope).await.unwrap();
    assert_eq!(third.to_string(), "3000");
    store
        .insert_record(&scope, "quilt", third, ExtraFields::new())
        .await;

    // Drag "stove" between "tent" and "quilt"'s *current* positions.
    let result = engine
        .move_item(
            &scope,
            &"stove".into(),
            Some("1000"),
            Some("3000"),
            &ExtraFields::new(),
        )
        .await
        .unwrap();
    assert_eq!(result.position.to_string(), "2000");
    assert_eq!(ordered_ids(&store, &scope).await, ["tent", "stove", "quilt"]);
}

#[tokio::test]
async fn move_round_trip_lands_between_requested_neighbors() {
    let scope = gear_scope("u1", "c1");
    let (engine, store) = seeded_scope(&scope, &["a", "b", "c", "d"]).await;

    // Move "d" between "a" (1000) and "b" (2000).
    let result = engine
        .move_item(&scope, &"d".into(), Some("1000"), Some("2000"), &ExtraFields::new())
        .await
        .unwrap();
    assert!(!result.rebalanced);

    let ids = ordered_ids(&store, &scope).await;
    assert_eq!(ids, ["a", "d", "b", "c"]);
    let positions = ordered_positions(&store, &scope).await;
    assert!(positions[0] < result.position && result.position < positions[2]);
}

#[tokio::test]
async fn stale_neighbors_trigger_full_rebalance() {
    let scope = gear_scope("u1", "c1");
    let (engine, store) = seeded_scope(&scope, &["a", "b", "c"]).await;

    let result = engine
        .move_item(&scope, &"b".into(), Some("3000"), Some("1000"), &ExtraFields::new())
        .await
        .unwrap();
    assert!(result.rebalanced);

    // Every member ends strictly increasing and evenly spaced.
    let positions = ordered_positions(&store, &scope).await;
    assert_eq!(positions, [pos("1000"), pos("2000"), pos("3000")]);
    assert_eq!(ordered_ids(&store, &scope).await, ["a", "c", "b"]);
}

#[tokio::test]
async fn repeated_front_inserts_walk_down_then_rebalance() {
    // Keep inserting at the front: 500, 250, 125, ... Every step halves the
    // head position, growing fractional digits until drift forces a
    // renumbering. The scope must stay strictly ordered throughout.
    let scope = gear_scope("u1", "c1");
    let (engine, store) = seeded_scope(&scope, &["seed"]).await;

    let mut head = position_of(&store, "seed").await;
    let mut saw_rebalance = false;
    for i in 0..60 {
        let id = format!("front{i}");
        let position = engine.next_append_position(&scope).await.unwrap();
        store
            .insert_record(&scope, id.clone(), position, ExtraFields::new())
            .await;

        let result = engine
            .move_item(
                &scope,
                &ItemId::from(id.as_str()),
                None,
                Some(head.as_str()),
                &ExtraFields::new(),
            )
            .await
            .unwrap();
        saw_rebalance |= result.rebalanced;

        let positions = ordered_positions(&store, &scope).await;
        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "scope lost strict ordering at iteration {i}"
        );
        head = positions[0].to_string();
    }
    assert!(saw_rebalance, "60 front inserts never drifted");
}

#[tokio::test]
async fn chained_inserts_before_a_zero_first_item() {
    let scope = gear_scope("u1", "c1");
    let (engine, store) = seeded_scope(&scope, &["a", "b"]).await;

    // Pull "b" before "a", then walk the head down to and below zero.
    let r1 = engine
        .move_item(&scope, &"b".into(), None, Some("1000"), &ExtraFields::new())
        .await
        .unwrap();
    assert_eq!(r1.position, pos("500"));

    // Client claims the head is at 0: sentinel path, head pinned to zero.
    store
        .insert_record(&scope, "c", pos("5000"), ExtraFields::new())
        .await;
    let r2 = engine
        .move_item(&scope, &"c".into(), None, Some("0"), &ExtraFields::new())
        .await
        .unwrap();
    assert_eq!(r2.position, pos("-1000"));
    assert!(r2.rebalanced);
    // The previous head ("b" at 500) was the fallback pin target.
    assert_eq!(position_of(&store, "b").await, "0");

    // Inserting before the now-negative head takes the sentinel again and
    // pins the current first item to zero.
    store
        .insert_record(&scope, "d", pos("5000"), ExtraFields::new())
        .await;
    let r3 = engine
        .move_item(&scope, &"d".into(), None, Some("-1000"), &ExtraFields::new())
        .await
        .unwrap();
    assert_eq!(r3.position, pos("-1000"));
    assert!(r3.rebalanced);
    assert_eq!(position_of(&store, "c").await, "0");

    // Known edge of the preserved rule: each sentinel insert parks the
    // previous head at zero, so two chained inserts leave both former heads
    // there. Ordering between them falls to the deterministic id tie-break;
    // the next reorder touching the scope rebalances it apart.
    let positions = ordered_positions(&store, &scope).await;
    assert_eq!(
        positions,
        [pos("-1000"), pos("0"), pos("0"), pos("1000")]
    );
    let ids = ordered_ids(&store, &scope).await;
    assert_eq!(ids[0], "d");
}

#[tokio::test]
async fn extra_fields_move_item_across_scopes_in_one_write() {
    let source = gear_scope("u1", "c1");
    let target = gear_scope("u1", "c2");
    let (engine, store) = seeded_scope(&source, &["a"]).await;
    store
        .insert_record(&target, "t1", pos("1000"), ExtraFields::new())
        .await;

    // Reposition "a" into c2 after "t1", changing scope membership in the
    // same atomic write as the position.
    let landing = engine.next_append_position(&target).await.unwrap();
    let mut extra = ExtraFields::new();
    extra.insert("category_id".into(), serde_json::json!("c2"));
    engine
        .move_item(
            &source,
            &"a".into(),
            Some("1000"),
            None,
            &extra,
        )
        .await
        .unwrap();
    // next_append_position was computed against the target before the move.
    assert_eq!(landing, pos("2000"));

    assert!(ordered_ids(&store, &source).await.is_empty());
    let item = store.get(&"a".into()).await.unwrap();
    assert!(item.scope.matches(&target));
}

#[tokio::test]
async fn deleting_a_category_relocates_children_to_the_closet() {
    let category = gear_scope("u1", "c1");
    let closet = gear_scope("u1", "closet");
    let (engine, store) = seeded_scope(&category, &["tent", "stove", "quilt"]).await;
    store
        .insert_record(&closet, "spork", pos("1000"), ExtraFields::new())
        .await;

    // Parent deleted: push its children after what the closet already holds.
    let children: Vec<ItemId> = ["tent", "stove", "quilt"].map(ItemId::from).to_vec();
    let start = engine.next_append_position(&closet).await.unwrap();
    engine
        .bulk_relocate(&children, &closet, Some(start))
        .await
        .unwrap();

    assert_eq!(
        ordered_ids(&store, &closet).await,
        ["spork", "tent", "stove", "quilt"]
    );
    assert!(ordered_ids(&store, &category).await.is_empty());

    // Gap-free sequence after the existing maximum.
    let positions = ordered_positions(&store, &closet).await;
    assert_eq!(
        positions,
        [pos("1000"), pos("2000"), pos("3000"), pos("4000")]
    );
}

#[tokio::test]
async fn engines_over_separate_stores_do_not_interfere() {
    let scope = gear_scope("u1", "c1");
    let store_a = Arc::new(InMemory::new());
    let store_b = Arc::new(InMemory::new());
    let engine_a = Engine::new(store_a.clone());
    let engine_b = Engine::new(store_b.clone());

    store_a
        .insert_record(&scope, "a", pos("1000"), ExtraFields::new())
        .await;

    assert_eq!(
        engine_a.next_append_position(&scope).await.unwrap(),
        pos("2000")
    );
    assert_eq!(
        engine_b.next_append_position(&scope).await.unwrap(),
        pos("1000")
    );
}

#[tokio::test]
async fn concurrent_moves_on_one_scope_stay_internally_consistent() {
    let scope = gear_scope("u1", "c1");
    let (engine, store) = seeded_scope(&scope, &["a", "b", "c", "d", "e"]).await;

    // Two racing repositions; last write wins per item, but the scope must
    // never end up with a torn batch.
    let e1 = engine.clone();
    let s1 = scope.clone();
    let t1 = tokio::spawn(async move {
        e1.move_item(&s1, &"a".into(), Some("3000"), Some("4000"), &ExtraFields::new())
            .await
    });
    let e2 = engine.clone();
    let s2 = scope.clone();
    let t2 = tokio::spawn(async move {
        e2.move_item(&s2, &"e".into(), Some("1000"), Some("2000"), &ExtraFields::new())
            .await
    });

    t1.await.unwrap().unwrap();
    t2.await.unwrap().unwrap();

    let positions = ordered_positions(&store, &scope).await;
    assert_eq!(positions.len(), 5);
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn move_reports_not_found_for_foreign_scope() {
    let scope = gear_scope("u1", "c1");
    let foreign = gear_scope("u2", "c1");
    let (engine, _store) = seeded_scope(&scope, &["a"]).await;

    let err = engine
        .move_item(&foreign, &"a".into(), None, None, &ExtraFields::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.is_storage_error());
    assert_eq!(err.module(), "store");
}

#[tokio::test]
async fn malformed_neighbor_strings_degrade_to_the_default_position() {
    let scope = gear_scope("u1", "c1");
    let (engine, store) = seeded_scope(&scope, &["a"]).await;

    let result = engine
        .move_item(
            &scope,
            &"a".into(),
            Some("not-a-number"),
            Some("also bad"),
            &ExtraFields::new(),
        )
        .await
        .unwrap();
    assert_eq!(result.position, pos("1000"));
    assert!(!result.rebalanced);
    assert_eq!(position_of(&store, "a").await, "1000");
}
