//! Integration tests for entity lifecycle

use worldsmith_foundation::ErrorKind;
use worldsmith_storage::{AreaType, ComponentKind, EntityCollection, EntityGraph};

use crate::common::{area, entity, id};

#[test]
fn area_added_then_removed_leaves_entity() {
    let mut graph = EntityGraph::new();
    graph.merge(EntityCollection::new().with(entity(1, "cellar")));
    graph.merge(EntityCollection::new().with(area(1, AreaType::Underground)));
    graph.remove_component(id(1), ComponentKind::Area).unwrap();

    let collection = graph.get(id(1)).unwrap();
    assert_eq!(collection.kinds(), vec![ComponentKind::Entity]);
    let deleted = graph.deleted_queue();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].entity_id, id(1));
    assert_eq!(deleted[0].component.kind(), ComponentKind::Area);
}

#[test]
fn remove_entity_without_entity_component_leaves_pool() {
    let mut graph = EntityGraph::new();
    graph.merge(EntityCollection::new().with(area(3, AreaType::Room)));
    let before = graph.snapshot();

    let err = graph.remove_entity(id(3)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidOperation(_)));
    assert_eq!(graph.snapshot(), before);

    let err = graph.remove_entity(id(4)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn remove_entity_clears_everything() {
    let mut graph = EntityGraph::new();
    graph.merge(
        EntityCollection::new()
            .with(entity(1, "hall"))
            .with(area(1, AreaType::Indoor)),
    );
    let removed = graph.remove_entity(id(1)).unwrap();
    assert_eq!(removed.collection.len(), 2);
    assert!(removed.cascades.is_empty());
    assert!(graph.is_empty());
    assert!(graph.entities_index().is_empty());
    assert_eq!(graph.take_deleted().len(), 2);
    assert!(graph.deleted_queue().is_empty());
}

#[test]
fn get_entities_only_lists_real_entities_by_id() {
    let mut graph = EntityGraph::new();
    graph.merge(EntityCollection::new().with(entity(20, "b")));
    graph.merge(EntityCollection::new().with(area(15, AreaType::Room)));
    graph.merge(EntityCollection::new().with(entity(3, "a")));
    let names: Vec<_> = graph
        .get_entities()
        .iter()
        .filter_map(|c| c.entity.as_ref().map(|e| e.name.clone()))
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}
