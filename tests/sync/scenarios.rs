//! End-to-end editor sessions

use serde_json::json;
use worldsmith_foundation::EntityId;
use worldsmith_storage::{Area, AreaType, ComponentKind, Entity, EntityCollection, Player};
use worldsmith_sync::{ChangeKind, FeedEvent, FeedRecord};

use crate::common::{Flaky, editor};

#[test]
fn area_added_then_removed() {
    let mut editor = editor();
    let x = editor.create_entity("cellar");
    editor.set_component(Area {
        inst: x,
        is_area: true,
        area_type: AreaType::Underground,
    });
    editor.remove_component(x, ComponentKind::Area).unwrap();

    assert_eq!(
        editor.graph().get(x).unwrap().kinds(),
        vec![ComponentKind::Entity]
    );
    let deleted = editor.graph().deleted_queue();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].component.kind(), ComponentKind::Area);

    // The Area never reached the remote, but its delete is still queued.
    let changes = editor.take_changes();
    let summary: Vec<_> = changes.iter().map(|c| (c.kind, c.target.kinds())).collect();
    assert_eq!(
        summary,
        vec![
            (ChangeKind::Delete, vec![ComponentKind::Area]),
            (ChangeKind::Update, vec![ComponentKind::Entity]),
        ]
    );
}

#[test]
fn local_edit_and_remote_update_stay_separate() {
    let mut editor = editor();
    let y = editor.create_entity("traveller");
    editor.take_changes();

    let mut renamed = editor.graph().get(y).unwrap().clone();
    renamed.entity.as_mut().unwrap().name = "wanderer".to_string();
    editor.edit(renamed);

    let remote = FeedRecord::new().with(
        "worldsmith",
        "Player",
        json!({ "inst": y.felt(), "is_player": true, "address": "0x99", "room": 77 }),
    );
    assert_eq!(editor.apply_remote(&FeedEvent::records(vec![remote])), 1);

    let collection = editor.graph().get(y).unwrap();
    assert_eq!(collection.entity.as_ref().unwrap().name, "wanderer");
    assert_eq!(
        collection.player.as_ref().map(|p: &Player| p.room),
        Some(EntityId::from(77u64))
    );

    let changes = editor.take_changes();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].entity_id, y);
    assert_eq!(changes[0].target.kinds(), vec![ComponentKind::Entity]);
}

#[tokio::test]
async fn failed_publish_keeps_only_the_failed_change() {
    let mut editor = editor();
    let first = editor.create_entity("first");
    let second = editor.create_entity("second");

    let mut dispatcher = Flaky::rejecting([first]);
    assert!(!editor.publish(&mut dispatcher).await);

    // The second change was still attempted and went out.
    assert_eq!(dispatcher.sent.len(), 1);
    assert_eq!(dispatcher.sent[0].entrypoint, "create_entity");
    assert_eq!(dispatcher.sent[0].calldata[0], second.felt());

    // The first is reported and still pending.
    assert_eq!(editor.notifier().failed, vec![first]);
    assert_eq!(editor.notifier().dirty, vec![true]);
    let pending: Vec<_> = editor.tracker().pending(first);
    assert_eq!(pending.len(), 1);
    assert!(editor.tracker().pending(second).is_empty());

    // A later retry succeeds.
    dispatcher.reject.clear();
    assert!(editor.publish(&mut dispatcher).await);
    assert!(!editor.is_dirty());
    assert_eq!(editor.notifier().dirty, vec![true, false]);
}

#[tokio::test]
async fn entity_removal_publishes_cascades() {
    let mut editor = editor();
    let room = editor.create_entity("room");
    let lamp = editor.create_entity("lamp");
    let rug = editor.create_entity("rug");
    editor.attach_child(room, lamp).unwrap();
    editor.attach_child(room, rug).unwrap();
    let mut dispatcher = Flaky::default();
    assert!(editor.publish(&mut dispatcher).await);
    dispatcher.sent.clear();

    editor.remove_entity(room).unwrap();
    assert!(editor.publish(&mut dispatcher).await);
    let sent: Vec<_> = dispatcher
        .sent
        .iter()
        .map(|c| (c.entrypoint.as_str(), c.calldata[0]))
        .collect();
    assert_eq!(
        sent,
        vec![
            ("delete_child_to_parent", lamp.felt()),
            ("delete_child_to_parent", rug.felt()),
            ("delete_entity", room.felt()),
            ("delete_parent_to_children", room.felt()),
        ]
    );
    editor.graph().check_invariants().unwrap();
}

#[tokio::test]
async fn recreated_entity_publishes_every_component() {
    let mut editor = editor();
    let x = editor.create_entity("shed");
    let mut dispatcher = Flaky::default();
    assert!(editor.publish(&mut dispatcher).await);
    dispatcher.sent.clear();

    editor.remove_entity(x).unwrap();
    editor.edit(EntityCollection::new().with(Entity {
        inst: x,
        is_entity: true,
        name: "new shed".to_string(),
        alt_names: vec![],
    }));
    editor.set_component(Area {
        inst: x,
        is_area: true,
        area_type: AreaType::Outdoor,
    });
    assert!(editor.publish(&mut dispatcher).await);

    let entrypoints: Vec<_> = dispatcher
        .sent
        .iter()
        .map(|c| c.entrypoint.as_str())
        .collect();
    assert_eq!(entrypoints, vec!["delete_entity", "create_entity", "create_area"]);
}

#[test]
fn remote_error_pauses_reconciliation() {
    let mut editor = editor();
    assert_eq!(editor.apply_remote(&FeedEvent::failure("stream reset")), 0);
    let record = FeedRecord::new().with(
        "worldsmith",
        "Entity",
        json!({ "inst": 5, "is_entity": true, "name": "remote" }),
    );
    assert_eq!(editor.apply_remote(&FeedEvent::records(vec![record.clone()])), 0);
    editor.recover_feed();
    assert_eq!(editor.apply_remote(&FeedEvent::records(vec![record])), 1);
    assert!(!editor.is_dirty());
}
