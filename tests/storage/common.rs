//! Shared builders for storage tests

use worldsmith_foundation::EntityId;
use worldsmith_storage::{
    Area, AreaType, ChildToParent, Entity, EntityCollection, EntityGraph, ParentToChildren,
};

pub fn id(n: u64) -> EntityId {
    EntityId::from(n)
}

pub fn entity(n: u64, name: &str) -> Entity {
    Entity {
        inst: id(n),
        is_entity: true,
        name: name.to_string(),
        alt_names: vec![],
    }
}

pub fn area(n: u64, area_type: AreaType) -> Area {
    Area {
        inst: id(n),
        is_area: true,
        area_type,
    }
}

/// Real parent with the given real children, linked both ways.
pub fn family(graph: &mut EntityGraph, parent: u64, children: &[u64]) {
    graph.merge(
        EntityCollection::new()
            .with(entity(parent, "parent"))
            .with(ParentToChildren {
                inst: id(parent),
                is_parent: true,
                children: children.iter().copied().map(id).collect(),
            }),
    );
    for child in children {
        graph.merge(
            EntityCollection::new()
                .with(entity(*child, "child"))
                .with(ChildToParent {
                    inst: id(*child),
                    is_child: true,
                    parent: id(parent),
                }),
        );
    }
}
