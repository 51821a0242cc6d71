//! Integration tests for the reconciliation feed

use serde_json::json;
use worldsmith_foundation::EntityId;
use worldsmith_storage::{ComponentKind, EntityGraph};
use worldsmith_sync::{FeedEvent, FeedRecord, FeedStatus, ReconciliationFeed};

#[test]
fn deliveries_decode_from_transport_json() {
    let event: FeedEvent = serde_json::from_value(json!({
        "data": [
            { "models": { "worldsmith": {
                "Entity": { "inst": "0x5", "is_entity": true, "name": "gate", "alt_names": [] },
                "Exit": { "inst": "0x5", "is_exit": true, "is_enterable": true,
                          "leads_to": "0x6", "direction_type": "North" }
            } } },
            { "models": { "worldsmith": { "Dict": { "k": 1 } } } }
        ]
    }))
    .unwrap();

    let mut graph = EntityGraph::new();
    let mut feed = ReconciliationFeed::new();
    assert_eq!(feed.handle(&mut graph, &event), 1);
    let gate = graph.get(EntityId::from(5u64)).unwrap();
    assert_eq!(gate.kinds(), vec![ComponentKind::Entity, ComponentKind::Exit]);
}

#[test]
fn remote_overwrites_local_wholesale() {
    let mut graph = EntityGraph::new();
    let mut feed = ReconciliationFeed::new();
    let named = |name: &str| {
        FeedRecord::new().with(
            "worldsmith",
            "Entity",
            json!({ "inst": 1, "is_entity": true, "name": name, "alt_names": ["x"] }),
        )
    };
    feed.apply(&mut graph, &named("first"));
    let outcome = feed.apply(&mut graph, &named("second")).unwrap();
    assert_eq!(outcome.changed, vec![ComponentKind::Entity]);
    // Re-delivering the same record changes nothing.
    let outcome = feed.apply(&mut graph, &named("second")).unwrap();
    assert!(outcome.is_unchanged());
}

#[test]
fn errored_feed_reports_message() {
    let mut graph = EntityGraph::new();
    let mut feed = ReconciliationFeed::new();
    let event = FeedEvent {
        data: Some(vec![FeedRecord::new()]),
        error: Some("timeout".to_string()),
    };
    assert_eq!(feed.handle(&mut graph, &event), 0);
    assert_eq!(feed.status(), &FeedStatus::Errored("timeout".to_string()));
}
