//! Integration tests walking through board-editing scenarios on the Small board.

use grooveboard_core::{
    BoardCatalog, BoardSize, BucketId, GestureController, InteractionMode, ItemId, ItemTemplate,
    Outcome, PlacementError, PlacementStore, ReorderTarget, LONG_PRESS_THRESHOLD,
};
use std::time::{Duration, Instant};

fn small_board() -> BoardSize {
    BoardCatalog::builtin().by_key("small").unwrap().clone()
}

fn piece(text: &str, width: u32) -> ItemTemplate {
    ItemTemplate::new(text, width).unwrap()
}

fn ids_in(store: &PlacementStore, bucket: BucketId) -> Vec<ItemId> {
    store
        .state()
        .items(bucket)
        .iter()
        .map(|item| item.id.clone())
        .collect()
}

/// Store with `A(100)` already moved into row-1.
fn state_one() -> (PlacementStore, ItemId) {
    let mut store = PlacementStore::new(small_board());
    let a = store.create_item(&piece("A", 100));
    store.move_item(&a, BucketId::Row1).unwrap();
    (store, a)
}

#[test]
fn move_into_empty_row() {
    let (store, a) = state_one();

    assert_eq!(ids_in(&store, BucketId::Row1), [a]);
    assert!(store.state().items(BucketId::Available).is_empty());
    assert_eq!(store.used_width(BucketId::Row1), 100);
}

#[test]
fn oversized_move_is_rejected_and_state_kept() {
    let (mut store, a) = state_one();
    let b = store.create_item(&piece("B", 150));
    let before = store.state().clone();

    let result = store.move_item(&b, BucketId::Row1);

    assert_eq!(
        result,
        Err(PlacementError::InsufficientCapacity {
            needed: 150,
            available: 124,
        })
    );
    assert_eq!(store.state(), &before);
    assert_eq!(ids_in(&store, BucketId::Row1), [a]);
    assert_eq!(ids_in(&store, BucketId::Available), [b]);
}

#[test]
fn move_into_second_row() {
    let (mut store, _) = state_one();
    let b = store.create_item(&piece("B", 124));

    store.move_item(&b, BucketId::Row2).unwrap();

    assert_eq!(ids_in(&store, BucketId::Row2), [b]);
    assert_eq!(store.used_width(BucketId::Row2), 124);
    assert_eq!(store.remaining(BucketId::Row2), Some(100));
}

#[test]
fn reorder_to_front() {
    let mut store = PlacementStore::new(small_board());
    let a = store.create_item(&piece("A", 50));
    let b = store.create_item(&piece("B", 60));
    let c = store.create_item(&piece("C", 70));
    for id in [&a, &b, &c] {
        store.move_item(id, BucketId::Row1).unwrap();
    }
    let used = store.used_width(BucketId::Row1);

    let outcome = store
        .reorder(BucketId::Row1, &c, ReorderTarget::Item(a.clone()))
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Reordered {
            bucket: BucketId::Row1,
            from: 2,
            to: 0,
        }
    );
    assert_eq!(ids_in(&store, BucketId::Row1), [c, a, b]);
    assert_eq!(store.used_width(BucketId::Row1), used);
}

#[test]
fn move_to_own_row_is_noop() {
    let (mut store, a) = state_one();
    let before = store.state().clone();

    assert_eq!(store.move_item(&a, BucketId::Row1), Ok(Outcome::Unchanged));
    assert_eq!(store.state(), &before);
}

#[test]
fn delete_unknown_is_noop() {
    let (mut store, _) = state_one();
    let before = store.state().clone();

    assert!(store.delete_item(&ItemId::from("X")).is_none());
    assert_eq!(store.state(), &before);
}

#[test]
fn drag_between_rows_through_item_target() {
    let mut store = PlacementStore::new(small_board());
    let mut gestures = GestureController::default();
    let a = store.create_item(&piece("A", 40));
    let b = store.create_item(&piece("B", 40));
    store.move_item(&b, BucketId::Row3).unwrap();

    // Dropping on B means "into B's row".
    gestures.drag_start(&store, &a);
    let outcome = gestures.drag_end(&mut store, &a, Some(b.as_str()));

    assert_eq!(
        outcome,
        Some(Outcome::Moved {
            item: a.clone(),
            from: BucketId::Available,
            to: BucketId::Row3,
        })
    );
    assert_eq!(ids_in(&store, BucketId::Row3), [b.clone(), a.clone()]);

    // Dragging A onto B again is now a same-row reorder.
    let outcome = gestures.drag_end(&mut store, &a, Some(b.as_str()));
    assert_eq!(
        outcome,
        Some(Outcome::Reordered {
            bucket: BucketId::Row3,
            from: 1,
            to: 0,
        })
    );
    assert_eq!(ids_in(&store, BucketId::Row3), [a, b]);
}

#[test]
fn drag_back_to_available() {
    let (mut store, a) = state_one();
    let mut gestures = GestureController::default();

    gestures.drag_end(&mut store, &a, Some("available"));

    assert_eq!(ids_in(&store, BucketId::Available), [a]);
    assert_eq!(store.used_width(BucketId::Row1), 0);
}

#[test]
fn touch_flow_long_press_then_menu() {
    let mut store = PlacementStore::new(small_board());
    let filler = store.create_item(&piece("Filler", 200));
    store.move_item(&filler, BucketId::Row1).unwrap();
    let a = store.create_item(&piece("A", 60));
    let mut gestures = GestureController::new(InteractionMode::Touch, LONG_PRESS_THRESHOLD);
    let t = Instant::now();

    gestures.long_press_start(a.clone(), t);
    assert!(gestures.poll_long_press(&store, t + Duration::from_millis(510)));

    let menu = gestures.menu().unwrap().clone();
    assert_eq!(menu.item, a);
    assert_eq!(menu.targets, [BucketId::Row2, BucketId::Row3]);

    gestures.menu_select(&mut store, &a, BucketId::Row2);
    assert_eq!(ids_in(&store, BucketId::Row2), [a]);
    assert!(gestures.menu().is_none());
}

#[test]
fn menu_choice_that_no_longer_fits_is_reported() {
    let mut store = PlacementStore::new(small_board());
    let a = store.create_item(&piece("A", 100));
    let mut gestures = GestureController::new(InteractionMode::Touch, LONG_PRESS_THRESHOLD);
    gestures.click(&store, &a);

    // The row fills up while the menu is open.
    let filler = store.create_item(&piece("Filler", 200));
    store.move_item(&filler, BucketId::Row1).unwrap();

    assert_eq!(gestures.menu_select(&mut store, &a, BucketId::Row1), None);
    assert_eq!(
        gestures.take_notice().unwrap().to_string(),
        "Not enough space! Need 100 units but only 24 available."
    );
    assert_eq!(ids_in(&store, BucketId::Available), [a]);
}

#[test]
fn board_switch_applies_to_every_row() {
    let catalog = BoardCatalog::builtin();
    let mut store = PlacementStore::new(small_board());
    let a = store.create_item(&piece("A", 300));

    assert!(!store.capacity_fits(BucketId::Row2, 300));
    store.set_active_board(catalog.by_key("medium").unwrap().clone());
    assert!(store.capacity_fits(BucketId::Row2, 300));

    store.move_item(&a, BucketId::Row2).unwrap();
    store.set_active_board(small_board());

    let usage = store.state().row_usage();
    assert_eq!(usage[1].used, 300);
    assert_eq!(usage[1].remaining, -76);
    assert!(usage[1].is_over_capacity());
}

#[test]
fn state_export_keeps_bucket_order() {
    let (store, _) = state_one();

    let json = serde_json::to_value(store.state()).unwrap();
    let buckets: Vec<&String> = json["buckets"].as_object().unwrap().keys().collect();

    assert_eq!(buckets, ["available", "row-1", "row-2", "row-3"]);
    assert_eq!(json["active_board"]["capacity"], 224);
    assert_eq!(json["buckets"]["row-1"][0]["width"], 100);
}
