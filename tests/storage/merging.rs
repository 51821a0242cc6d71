//! Integration tests for partial merges

use proptest::prelude::*;
use worldsmith_storage::{AreaType, Component, ComponentKind, EntityCollection, EntityGraph};

use crate::common::{area, entity, id};

#[test]
fn merge_overwrites_whole_components() {
    let mut graph = EntityGraph::new();
    let mut first = entity(1, "hall");
    first.alt_names = vec!["corridor".to_string()];
    graph.merge(EntityCollection::new().with(first));
    graph.merge(EntityCollection::new().with(entity(1, "great hall")));

    let stored = graph.get(id(1)).unwrap().entity.clone().unwrap();
    assert_eq!(stored.name, "great hall");
    assert!(stored.alt_names.is_empty());
}

#[test]
fn merge_keeps_untouched_components() {
    let mut graph = EntityGraph::new();
    graph.merge(
        EntityCollection::new()
            .with(entity(1, "hall"))
            .with(area(1, AreaType::Room)),
    );
    let outcome = graph
        .merge(EntityCollection::new().with(area(1, AreaType::Outdoor)))
        .unwrap();
    assert!(!outcome.created);
    assert_eq!(outcome.changed, vec![ComponentKind::Area]);
    assert_eq!(graph.get(id(1)).unwrap().len(), 2);
}

#[test]
fn collection_json_round_trip() {
    let json = r#"{
        "Entity": {"inst": "0x1", "is_entity": true, "name": "hall", "alt_names": ["corridor"]},
        "Area": {"inst": "0x1", "is_area": true, "area_type": "Indoor"}
    }"#;
    let collection: EntityCollection = serde_json::from_str(json).unwrap();
    assert_eq!(collection.entity_id(), Some(id(1)));
    let again: EntityCollection =
        serde_json::from_str(&serde_json::to_string(&collection).unwrap()).unwrap();
    assert_eq!(again, collection);
}

fn component() -> impl Strategy<Value = Component> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(|name| Component::Entity(entity(1, &name))),
        (0usize..5).prop_map(|i| {
            let kinds = [
                AreaType::None,
                AreaType::Room,
                AreaType::Indoor,
                AreaType::Outdoor,
                AreaType::Underground,
            ];
            Component::Area(area(1, kinds[i]))
        }),
    ]
}

proptest! {
    /// Merging the same final per-kind values in any order yields the same collection.
    #[test]
    fn merge_is_order_independent_per_component(
        components in prop::collection::vec(component(), 1..10),
        seed in any::<u64>(),
    ) {
        // The last value of each kind is what both orders must agree on.
        let mut finals: Vec<Component> = Vec::new();
        for c in &components {
            finals.retain(|f| f.kind() != c.kind());
            finals.push(c.clone());
        }

        let mut forward = EntityGraph::new();
        for c in &components {
            forward.merge(EntityCollection::from(c.clone()));
        }

        let mut shuffled = finals.clone();
        if seed % 2 == 1 {
            shuffled.reverse();
        }
        let mut other = EntityGraph::new();
        for c in shuffled {
            other.merge(EntityCollection::from(c));
        }

        prop_assert_eq!(forward.get(id(1)), other.get(id(1)));
    }
}
