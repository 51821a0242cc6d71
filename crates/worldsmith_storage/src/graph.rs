//! The entity graph store.
//!
//! `EntityGraph` owns the data pool (`EntityId → EntityCollection`), the
//! entities index, the deleted-component log and a cached hierarchy view.
//! The pool and index are persistent `im` structures, so snapshots are O(1)
//! clones that share structure with the live graph.
//!
//! Parent/child links are stored redundantly (`ChildToParent` on the child,
//! `ParentToChildren` on the parent). Every removal validates both sides
//! before mutating anything, so a failed removal leaves the graph as it was.

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};
use worldsmith_foundation::{EntityId, Error, ErrorContext, Result};

use crate::collection::EntityCollection;
use crate::component::{ChildToParent, Component, ComponentKind, Entity, ParentToChildren};
use crate::hierarchy::Hierarchy;

/// A component removed from the graph, with its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletedComponent {
    /// The entity that held the component.
    pub entity_id: EntityId,
    /// The removed value.
    pub component: Component,
}

/// What a merge did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The entity merged into.
    pub entity_id: EntityId,
    /// True if the entity was not in the pool before.
    pub created: bool,
    /// Kinds whose stored value changed, canonical order.
    pub changed: Vec<ComponentKind>,
}

impl MergeOutcome {
    /// True if nothing was written.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }
}

/// A side effect of a removal on a relation component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cascade {
    /// A parent's child list shrank but is not empty.
    ChildrenUpdated {
        /// The parent.
        parent: EntityId,
        /// Its new `ParentToChildren`.
        component: ParentToChildren,
    },
    /// A parent lost its last child, so `ParentToChildren` was removed.
    ChildrenRemoved {
        /// The parent.
        parent: EntityId,
        /// The removed `ParentToChildren`.
        component: ParentToChildren,
    },
    /// A child lost its `ChildToParent` because its parent link was cut.
    ChildDetached {
        /// The child.
        child: EntityId,
        /// The removed `ChildToParent`.
        component: ChildToParent,
    },
}

impl Cascade {
    /// The entity the cascade touched.
    #[must_use]
    pub fn entity_id(&self) -> EntityId {
        match self {
            Self::ChildrenUpdated { parent, .. } | Self::ChildrenRemoved { parent, .. } => *parent,
            Self::ChildDetached { child, .. } => *child,
        }
    }
}

/// Everything `remove_entity` took out of the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovedEntity {
    /// The removed entity.
    pub entity_id: EntityId,
    /// Its collection as it was before removal.
    pub collection: EntityCollection,
    /// Effects on other entities.
    pub cascades: Vec<Cascade>,
}

/// In-memory entity store.
#[derive(Clone, Debug, Default)]
pub struct EntityGraph {
    pool: im::HashMap<EntityId, EntityCollection>,
    index: im::Vector<Entity>,
    deleted: Vec<DeletedComponent>,
    hierarchy: Option<Hierarchy>,
}

impl EntityGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph by merging each collection in turn.
    pub fn from_collections(collections: impl IntoIterator<Item = EntityCollection>) -> Self {
        let mut graph = Self::new();
        for collection in collections {
            graph.merge(collection);
        }
        graph
    }

    // --- Queries ---

    /// Returns the collection for `id`.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&EntityCollection> {
        self.pool.get(&id)
    }

    /// Returns a copy of one component.
    #[must_use]
    pub fn component(&self, id: EntityId, kind: ComponentKind) -> Option<Component> {
        self.pool.get(&id).and_then(|c| c.get(kind))
    }

    /// Checks if `id` has a collection.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.pool.contains_key(&id)
    }

    /// Number of collections in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// True if the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Every id in the pool, ascending.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.pool.keys().copied().collect();
        ids.sort();
        ids
    }

    /// The `Entity` components of real entities, in first-insertion order.
    #[must_use]
    pub fn entities_index(&self) -> &im::Vector<Entity> {
        &self.index
    }

    /// Collections of real entities, ascending by id.
    #[must_use]
    pub fn get_entities(&self) -> Vec<EntityCollection> {
        let mut entities: Vec<EntityCollection> = self
            .index
            .iter()
            .filter_map(|entity| self.pool.get(&entity.inst).cloned())
            .collect();
        entities.sort_by_key(EntityCollection::entity_id);
        entities
    }

    /// Components removed so far, in removal order.
    #[must_use]
    pub fn deleted_queue(&self) -> &[DeletedComponent] {
        &self.deleted
    }

    /// Drains the deleted log.
    pub fn take_deleted(&mut self) -> Vec<DeletedComponent> {
        std::mem::take(&mut self.deleted)
    }

    /// O(1) copy of the data pool.
    #[must_use]
    pub fn snapshot(&self) -> im::HashMap<EntityId, EntityCollection> {
        self.pool.clone()
    }

    /// The hierarchy view, rebuilt if a relation changed since last call.
    pub fn hierarchy(&mut self) -> &Hierarchy {
        self.hierarchy
            .get_or_insert_with(|| Hierarchy::build(self.pool.values()))
    }

    // --- Merge ---

    /// Merges a partial collection into the pool.
    ///
    /// The target id is the `inst` of the first present component. Components
    /// owned by another id are dropped. Each supplied component replaces the
    /// stored one of its kind wholesale. Returns `None` when the partial holds
    /// no component.
    pub fn merge(&mut self, partial: EntityCollection) -> Option<MergeOutcome> {
        let Some(entity_id) = partial.entity_id() else {
            debug!("merge skipped: no components");
            return None;
        };

        let mut accepted = EntityCollection::new();
        for component in partial.into_components() {
            if component.inst() == entity_id {
                accepted.set(component);
            } else {
                warn!(
                    %entity_id,
                    inst = %component.inst(),
                    kind = %component.kind(),
                    "merge dropped component owned by another entity"
                );
            }
        }

        let (created, changed) = match self.pool.get_mut(&entity_id) {
            Some(existing) => (false, existing.merge_from(accepted)),
            None => {
                let kinds = accepted.kinds();
                self.pool.insert(entity_id, accepted);
                (true, kinds)
            }
        };

        if changed.contains(&ComponentKind::Entity) {
            if let Some(entity) = self.pool.get(&entity_id).and_then(|c| c.entity.clone()) {
                self.upsert_index(entity);
            }
        }
        if changed.iter().any(|k| *k == ComponentKind::Entity || k.is_relation()) {
            self.hierarchy = None;
        }

        trace!(%entity_id, created, ?changed, "merged");
        Some(MergeOutcome {
            entity_id,
            created,
            changed,
        })
    }

    // --- Removal ---

    /// Removes one component.
    ///
    /// Removing `ChildToParent` also takes the child out of its parent's
    /// list. Removing `ParentToChildren` first detaches every listed child.
    /// Removing `Entity` takes the entity out of the index. Returns the
    /// effects on other entities.
    ///
    /// # Errors
    ///
    /// Not-found errors for an absent entity or component. Invariant
    /// violations when the two sides of a parent/child link disagree; the
    /// graph is unchanged in that case.
    pub fn remove_component(&mut self, id: EntityId, kind: ComponentKind) -> Result<Vec<Cascade>> {
        let collection = self.pool.get(&id).ok_or_else(|| Error::entity_not_found(id))?;
        if !collection.contains(kind) {
            return Err(Error::component_not_found(id, kind.name()));
        }

        let cascades = match kind {
            ComponentKind::ChildToParent => {
                let (_, cascade) = self.unlink_child(id)?;
                vec![cascade]
            }
            ComponentKind::ParentToChildren => {
                let children = collection
                    .parent_to_children
                    .as_ref()
                    .map(|p| p.children.clone())
                    .unwrap_or_default();
                self.validate_children(id, &children)
                    .map_err(|e| e.with_context(remove_context(id, kind)))?;
                let cascades = self.detach_children(id, &children)?;
                // Still present only if the list was already empty.
                if let Some(component) = self.take_component(id, kind) {
                    self.log_deleted(id, component);
                }
                cascades
            }
            _ => {
                if let Some(component) = self.take_component(id, kind) {
                    self.log_deleted(id, component);
                }
                Vec::new()
            }
        };

        if kind == ComponentKind::Entity {
            self.remove_from_index(id);
        }
        if kind == ComponentKind::Entity || kind.is_relation() {
            self.hierarchy = None;
        }
        debug!(entity_id = %id, %kind, cascades = cascades.len(), "removed component");
        Ok(cascades)
    }

    /// Detaches `child` from its parent.
    ///
    /// # Errors
    ///
    /// Invariant violation when the child has no `ChildToParent` or the
    /// parent does not list it exactly once.
    pub fn remove_parent(&mut self, child: EntityId) -> Result<Vec<Cascade>> {
        let collection = self
            .pool
            .get(&child)
            .ok_or_else(|| Error::entity_not_found(child))?;
        if collection.child_to_parent.is_none() {
            return Err(Error::invariant(format!("{child} has no parent")).with_context(
                ErrorContext::new()
                    .with_operation("remove_parent")
                    .with_entity(child),
            ));
        }
        self.remove_component(child, ComponentKind::ChildToParent)
    }

    /// Removes an entity and all its components.
    ///
    /// Children are detached first, then the entity leaves its own parent,
    /// then every remaining component is removed.
    ///
    /// # Errors
    ///
    /// `EntityNotFound` for an absent id, `InvalidOperation` when the
    /// collection has no `Entity` component, and invariant violations when a
    /// parent/child link is inconsistent. Nothing is changed on error.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<RemovedEntity> {
        let context = || ErrorContext::new().with_operation("remove_entity").with_entity(id);
        let collection = self
            .pool
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::entity_not_found(id).with_context(context()))?;
        if !collection.is_real() {
            return Err(
                Error::invalid_operation(format!("{id} has no Entity component"))
                    .with_context(context()),
            );
        }

        let children = collection
            .parent_to_children
            .as_ref()
            .map(|p| p.children.clone())
            .unwrap_or_default();
        self.validate_children(id, &children)
            .map_err(|e| e.with_context(context()))?;
        if collection.child_to_parent.is_some() {
            self.validate_link(id)
                .map_err(|e| e.with_context(context()))?;
        }

        let mut cascades = self.detach_children(id, &children)?;
        // A self-parented entity lost its own link while detaching children.
        let still_linked = self
            .pool
            .get(&id)
            .is_some_and(|c| c.child_to_parent.is_some());
        if still_linked {
            let (_, cascade) = self.unlink_child(id)?;
            cascades.push(cascade);
        }

        let remaining = self.pool.get(&id).map(EntityCollection::kinds).unwrap_or_default();
        for kind in remaining {
            cascades.extend(self.remove_component(id, kind)?);
        }

        self.pool.remove(&id);
        self.remove_from_index(id);
        self.hierarchy = None;
        debug!(entity_id = %id, cascades = cascades.len(), "removed entity");
        Ok(RemovedEntity {
            entity_id: id,
            collection,
            cascades,
        })
    }

    /// Verifies the parent/child invariant and index consistency.
    ///
    /// # Errors
    ///
    /// The first violation found, as an invariant violation.
    pub fn check_invariants(&self) -> Result<()> {
        for id in self.ids() {
            let Some(collection) = self.pool.get(&id) else {
                continue;
            };
            if collection.child_to_parent.is_some() {
                self.validate_link(id)?;
            }
            if let Some(ptc) = &collection.parent_to_children {
                self.validate_children(id, &ptc.children)?;
            }
        }
        for entity in &self.index {
            let stored = self.pool.get(&entity.inst).and_then(|c| c.entity.as_ref());
            if stored != Some(entity) {
                return Err(Error::invariant(format!(
                    "index entry for {} does not match the pool",
                    entity.inst
                )));
            }
        }
        Ok(())
    }

    // --- Internals ---

    /// Checks that `child`'s parent lists it exactly once.
    fn validate_link(&self, child: EntityId) -> Result<()> {
        let parent = self
            .pool
            .get(&child)
            .and_then(|c| c.child_to_parent.as_ref())
            .map(|c| c.parent)
            .ok_or_else(|| Error::invariant(format!("{child} has no parent")))?;
        let listed = self
            .pool
            .get(&parent)
            .and_then(|c| c.parent_to_children.as_ref())
            .map_or(0, |p| p.children.iter().filter(|c| **c == child).count());
        if listed == 1 {
            Ok(())
        } else {
            Err(Error::invariant(format!(
                "{parent} lists {child} {listed} times, expected once"
            )))
        }
    }

    /// Checks that each listed child exists once and points back at `parent`.
    fn validate_children(&self, parent: EntityId, children: &[EntityId]) -> Result<()> {
        let mut seen = BTreeSet::new();
        for child in children {
            if !seen.insert(*child) {
                return Err(Error::invariant(format!(
                    "{parent} lists {child} more than once"
                )));
            }
            let points_back = self
                .pool
                .get(child)
                .and_then(|c| c.child_to_parent.as_ref())
                .is_some_and(|c| c.parent == parent);
            if !points_back {
                return Err(Error::invariant(format!(
                    "{child} is listed under {parent} but does not point back"
                )));
            }
        }
        Ok(())
    }

    /// Detaches already-validated children from `parent`.
    ///
    /// Cascades on `parent` itself are intermediate states and are dropped.
    fn detach_children(&mut self, parent: EntityId, children: &[EntityId]) -> Result<Vec<Cascade>> {
        let mut cascades = Vec::with_capacity(children.len());
        for child in children {
            let (component, _) = self.unlink_child(*child)?;
            cascades.push(Cascade::ChildDetached {
                child: *child,
                component,
            });
        }
        trace!(%parent, detached = children.len(), "detached children");
        Ok(cascades)
    }

    /// Removes `child`'s `ChildToParent` and its entry in the parent's list.
    fn unlink_child(&mut self, child: EntityId) -> Result<(ChildToParent, Cascade)> {
        self.validate_link(child)?;
        let Some(Component::ChildToParent(link)) =
            self.take_component(child, ComponentKind::ChildToParent)
        else {
            return Err(Error::invariant(format!("{child} has no parent")));
        };
        self.log_deleted(child, Component::ChildToParent(link.clone()));
        let parent = link.parent;

        let mut remaining = None;
        if let Some(ptc) = self
            .pool
            .get_mut(&parent)
            .and_then(|c| c.parent_to_children.as_mut())
        {
            ptc.children.retain(|c| *c != child);
            if !ptc.children.is_empty() {
                remaining = Some(ptc.clone());
            }
        }

        let cascade = if let Some(component) = remaining {
            Cascade::ChildrenUpdated { parent, component }
        } else {
            match self.take_component(parent, ComponentKind::ParentToChildren) {
                Some(Component::ParentToChildren(component)) => {
                    self.log_deleted(parent, Component::ParentToChildren(component.clone()));
                    Cascade::ChildrenRemoved { parent, component }
                }
                _ => return Err(Error::invariant(format!("{parent} has no children list"))),
            }
        };
        self.hierarchy = None;
        Ok((link, cascade))
    }

    /// Takes a component out, evicting the collection once it is empty.
    fn take_component(&mut self, id: EntityId, kind: ComponentKind) -> Option<Component> {
        let collection = self.pool.get_mut(&id)?;
        let component = collection.take(kind);
        if collection.is_empty() {
            self.pool.remove(&id);
        }
        component
    }

    fn log_deleted(&mut self, entity_id: EntityId, component: Component) {
        self.deleted.push(DeletedComponent {
            entity_id,
            component,
        });
    }

    fn upsert_index(&mut self, entity: Entity) {
        match self.index.iter().position(|e| e.inst == entity.inst) {
            Some(at) => {
                self.index.set(at, entity);
            }
            None => self.index.push_back(entity),
        }
    }

    fn remove_from_index(&mut self, id: EntityId) {
        if let Some(at) = self.index.iter().position(|e| e.inst == id) {
            self.index.remove(at);
        }
    }
}

fn remove_context(id: EntityId, kind: ComponentKind) -> ErrorContext {
    ErrorContext::new()
        .with_operation("remove_component")
        .with_entity(id)
        .with_frame(kind.name())
}
