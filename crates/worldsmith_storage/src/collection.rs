//! Per-entity component collections.
//!
//! An `EntityCollection` is the unit of storage per entity id: one optional
//! slot per component kind. The same type doubles as a partial update, in
//! which case only the supplied slots are set.

use serde::{Deserialize, Serialize};
use worldsmith_foundation::EntityId;

use crate::component::{
    Area, ChildToParent, Component, ComponentKind, Container, Entity, Exit, Inspectable,
    InventoryItem, ParentToChildren, Player,
};

/// Components of one entity, keyed by the closed set of kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCollection {
    /// [`Entity`] slot.
    #[serde(rename = "Entity", default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
    /// [`Area`] slot.
    #[serde(rename = "Area", default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,
    /// [`Exit`] slot.
    #[serde(rename = "Exit", default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<Exit>,
    /// [`Inspectable`] slot.
    #[serde(rename = "Inspectable", default, skip_serializing_if = "Option::is_none")]
    pub inspectable: Option<Inspectable>,
    /// [`Container`] slot.
    #[serde(rename = "Container", default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
    /// [`InventoryItem`] slot.
    #[serde(rename = "InventoryItem", default, skip_serializing_if = "Option::is_none")]
    pub inventory_item: Option<InventoryItem>,
    /// [`Player`] slot.
    #[serde(rename = "Player", default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,
    /// [`ChildToParent`] slot.
    #[serde(rename = "ChildToParent", default, skip_serializing_if = "Option::is_none")]
    pub child_to_parent: Option<ChildToParent>,
    /// [`ParentToChildren`] slot.
    #[serde(
        rename = "ParentToChildren",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_to_children: Option<ParentToChildren>,
}

impl EntityCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collection with the component set.
    #[must_use]
    pub fn with(mut self, component: impl Into<Component>) -> Self {
        self.set(component.into());
        self
    }

    /// The id this collection belongs to: the `inst` of the first present
    /// component in canonical order.
    #[must_use]
    pub fn entity_id(&self) -> Option<EntityId> {
        self.components().first().map(Component::inst)
    }

    /// True if the collection holds an `Entity` component.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.entity.is_some()
    }

    /// Returns a copy of the component of the given kind.
    #[must_use]
    pub fn get(&self, kind: ComponentKind) -> Option<Component> {
        match kind {
            ComponentKind::Entity => self.entity.clone().map(Component::Entity),
            ComponentKind::Area => self.area.clone().map(Component::Area),
            ComponentKind::Exit => self.exit.clone().map(Component::Exit),
            ComponentKind::Inspectable => self.inspectable.clone().map(Component::Inspectable),
            ComponentKind::Container => self.container.clone().map(Component::Container),
            ComponentKind::InventoryItem => {
                self.inventory_item.clone().map(Component::InventoryItem)
            }
            ComponentKind::Player => self.player.clone().map(Component::Player),
            ComponentKind::ChildToParent => {
                self.child_to_parent.clone().map(Component::ChildToParent)
            }
            ComponentKind::ParentToChildren => self
                .parent_to_children
                .clone()
                .map(Component::ParentToChildren),
        }
    }

    /// Checks if a component of the given kind is present.
    #[must_use]
    pub fn contains(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Entity => self.entity.is_some(),
            ComponentKind::Area => self.area.is_some(),
            ComponentKind::Exit => self.exit.is_some(),
            ComponentKind::Inspectable => self.inspectable.is_some(),
            ComponentKind::Container => self.container.is_some(),
            ComponentKind::InventoryItem => self.inventory_item.is_some(),
            ComponentKind::Player => self.player.is_some(),
            ComponentKind::ChildToParent => self.child_to_parent.is_some(),
            ComponentKind::ParentToChildren => self.parent_to_children.is_some(),
        }
    }

    /// Sets a component, returning the previous value of that kind.
    pub fn set(&mut self, component: Component) -> Option<Component> {
        let previous = self.take(component.kind());
        match component {
            Component::Entity(c) => self.entity = Some(c),
            Component::Area(c) => self.area = Some(c),
            Component::Exit(c) => self.exit = Some(c),
            Component::Inspectable(c) => self.inspectable = Some(c),
            Component::Container(c) => self.container = Some(c),
            Component::InventoryItem(c) => self.inventory_item = Some(c),
            Component::Player(c) => self.player = Some(c),
            Component::ChildToParent(c) => self.child_to_parent = Some(c),
            Component::ParentToChildren(c) => self.parent_to_children = Some(c),
        }
        previous
    }

    /// Removes and returns the component of the given kind.
    pub fn take(&mut self, kind: ComponentKind) -> Option<Component> {
        match kind {
            ComponentKind::Entity => self.entity.take().map(Component::Entity),
            ComponentKind::Area => self.area.take().map(Component::Area),
            ComponentKind::Exit => self.exit.take().map(Component::Exit),
            ComponentKind::Inspectable => self.inspectable.take().map(Component::Inspectable),
            ComponentKind::Container => self.container.take().map(Component::Container),
            ComponentKind::InventoryItem => {
                self.inventory_item.take().map(Component::InventoryItem)
            }
            ComponentKind::Player => self.player.take().map(Component::Player),
            ComponentKind::ChildToParent => {
                self.child_to_parent.take().map(Component::ChildToParent)
            }
            ComponentKind::ParentToChildren => self
                .parent_to_children
                .take()
                .map(Component::ParentToChildren),
        }
    }

    /// Kinds present, in canonical order.
    #[must_use]
    pub fn kinds(&self) -> Vec<ComponentKind> {
        ComponentKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    /// Copies of the present components, in canonical order.
    #[must_use]
    pub fn components(&self) -> Vec<Component> {
        ComponentKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind))
            .collect()
    }

    /// Consumes the collection, yielding its components in canonical order.
    #[must_use]
    pub fn into_components(mut self) -> Vec<Component> {
        ComponentKind::ALL
            .into_iter()
            .filter_map(|kind| self.take(kind))
            .collect()
    }

    /// Number of present components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds().len()
    }

    /// True if no component is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrites every component present in `partial`, wholesale.
    ///
    /// Returns the kinds whose stored value actually changed.
    pub fn merge_from(&mut self, partial: EntityCollection) -> Vec<ComponentKind> {
        let mut changed = Vec::new();
        for component in partial.into_components() {
            let kind = component.kind();
            let previous = self.set(component);
            if previous.as_ref() != self.get(kind).as_ref() {
                changed.push(kind);
            }
        }
        changed
    }

    /// Returns a collection holding only the given kinds.
    #[must_use]
    pub fn select(&self, kinds: &[ComponentKind]) -> EntityCollection {
        kinds.iter().filter_map(|kind| self.get(*kind)).collect()
    }

    /// Removes the given kinds, keeping the rest.
    pub fn remove_kinds(&mut self, kinds: &[ComponentKind]) {
        for kind in kinds {
            self.take(*kind);
        }
    }
}

impl FromIterator<Component> for EntityCollection {
    fn from_iter<I: IntoIterator<Item = Component>>(iter: I) -> Self {
        let mut collection = Self::new();
        for component in iter {
            collection.set(component);
        }
        collection
    }
}

impl From<Component> for EntityCollection {
    fn from(component: Component) -> Self {
        Self::new().with(component)
    }
}
