//! Local change tracking.
//!
//! The tracker keeps at most one pending update and one pending delete per
//! entity. Entries drain in the order their entity was first touched; for a
//! single entity the delete drains before the update, so re-creating a
//! component after removing it publishes as delete-then-create.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;
use worldsmith_foundation::EntityId;
use worldsmith_storage::{ComponentKind, EntityCollection};

/// Whether a change writes or removes components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Components to create or overwrite.
    Update,
    /// Components to remove.
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Update => f.write_str("update"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// One publishable entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    /// Update or delete.
    pub kind: ChangeKind,
    /// The entity changed.
    pub entity_id: EntityId,
    /// The components involved. For deletes, the values that were removed.
    pub target: EntityCollection,
}

impl Change {
    /// Creates an update entry.
    #[must_use]
    pub fn update(entity_id: EntityId, target: EntityCollection) -> Self {
        Self {
            kind: ChangeKind::Update,
            entity_id,
            target,
        }
    }

    /// Creates a delete entry.
    #[must_use]
    pub fn delete(entity_id: EntityId, target: EntityCollection) -> Self {
        Self {
            kind: ChangeKind::Delete,
            entity_id,
            target,
        }
    }

    /// True if this delete removes the `Entity` component.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.kind == ChangeKind::Delete && self.target.is_real()
    }
}

#[derive(Clone, Debug, Default)]
struct Pending {
    update: Option<EntityCollection>,
    delete: Option<EntityCollection>,
    /// Set by a whole-entity removal, cleared by a re-creation.
    removed: bool,
}

impl Pending {
    fn is_empty(&self) -> bool {
        self.update.is_none() && self.delete.is_none()
    }

    fn terminal(&self) -> bool {
        self.removed && !self.update.as_ref().is_some_and(EntityCollection::is_real)
    }
}

/// Ordered queue of pending changes.
#[derive(Clone, Debug, Default)]
pub struct ChangeTracker {
    order: Vec<EntityId>,
    pending: HashMap<EntityId, Pending>,
}

impl ChangeTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records components written locally.
    ///
    /// Later components replace earlier ones of the same kind. After a
    /// whole-entity removal, only an update carrying an `Entity` component (a
    /// re-creation) is accepted; once re-created, the entity takes partial
    /// updates again. Returns whether the update was recorded.
    pub fn record_update(&mut self, entity_id: EntityId, target: EntityCollection) -> bool {
        if target.is_empty() {
            return false;
        }
        if self
            .pending
            .get(&entity_id)
            .is_some_and(|p| p.terminal() && !target.is_real())
        {
            debug!(%entity_id, kinds = ?target.kinds(), "update ignored: entity is pending delete");
            return false;
        }
        let entry = self.entry(entity_id);
        if target.is_real() {
            entry.removed = false;
        }
        match &mut entry.update {
            Some(update) => {
                update.merge_from(target);
            }
            None => entry.update = Some(target),
        }
        true
    }

    /// Records components removed locally.
    ///
    /// The removed kinds are unioned into the pending delete and stripped from
    /// the pending update. The entity's other components stay editable.
    pub fn record_delete(&mut self, entity_id: EntityId, target: EntityCollection) {
        if target.is_empty() {
            return;
        }
        let kinds = target.kinds();
        let entry = self.entry(entity_id);
        match &mut entry.delete {
            Some(delete) => {
                delete.merge_from(target);
            }
            None => entry.delete = Some(target),
        }
        if let Some(update) = &mut entry.update {
            update.remove_kinds(&kinds);
            if update.is_empty() {
                entry.update = None;
            }
        }
    }

    /// Records the removal of a whole entity.
    ///
    /// Like [`record_delete`](Self::record_delete), but the pending update is
    /// dropped and partial updates are refused until the entity is re-created.
    pub fn record_removal(&mut self, entity_id: EntityId, target: EntityCollection) {
        if target.is_empty() {
            return;
        }
        self.record_delete(entity_id, target);
        let entry = self.entry(entity_id);
        entry.update = None;
        entry.removed = true;
    }

    /// Puts entries back after a failed publish.
    ///
    /// Anything recorded for the same entity since the drain takes
    /// precedence: newer update components win, kinds deleted since are not
    /// resurrected, and an entity removed since only takes back a re-creation.
    pub fn requeue(&mut self, changes: impl IntoIterator<Item = Change>) {
        for change in changes {
            let entity_id = change.entity_id;
            let entry = self.entry(entity_id);
            match change.kind {
                ChangeKind::Update if entry.terminal() => {
                    debug!(%entity_id, "requeued update dropped: entity is pending delete");
                }
                ChangeKind::Update => {
                    let mut target = change.target;
                    if let Some(delete) = &entry.delete {
                        target.remove_kinds(&delete.kinds());
                    }
                    if let Some(newer) = entry.update.take() {
                        target.merge_from(newer);
                    }
                    entry.update = (!target.is_empty()).then_some(target);
                }
                ChangeKind::Delete => {
                    let mut target = change.target;
                    if let Some(newer) = entry.delete.take() {
                        target.merge_from(newer);
                    }
                    entry.delete = Some(target);
                }
            }
            if entry.is_empty() {
                self.forget(entity_id);
            }
        }
    }

    /// Removes and returns every pending entry.
    pub fn drain(&mut self) -> Vec<Change> {
        let mut out = Vec::with_capacity(self.order.len());
        for entity_id in std::mem::take(&mut self.order) {
            let Some(pending) = self.pending.remove(&entity_id) else {
                continue;
            };
            if let Some(target) = pending.delete {
                out.push(Change::delete(entity_id, target));
            }
            if let Some(target) = pending.update {
                out.push(Change::update(entity_id, target));
            }
        }
        out
    }

    /// Copies of the entries pending for one entity, in drain order.
    #[must_use]
    pub fn pending(&self, entity_id: EntityId) -> Vec<Change> {
        let Some(pending) = self.pending.get(&entity_id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if let Some(target) = &pending.delete {
            out.push(Change::delete(entity_id, target.clone()));
        }
        if let Some(target) = &pending.update {
            out.push(Change::update(entity_id, target.clone()));
        }
        out
    }

    /// Kinds pending update for one entity.
    #[must_use]
    pub fn pending_update_kinds(&self, entity_id: EntityId) -> Vec<ComponentKind> {
        self.pending
            .get(&entity_id)
            .and_then(|p| p.update.as_ref())
            .map(EntityCollection::kinds)
            .unwrap_or_default()
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
            .values()
            .map(|p| usize::from(p.update.is_some()) + usize::from(p.delete.is_some()))
            .sum()
    }

    /// True if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.values().all(Pending::is_empty)
    }

    fn entry(&mut self, entity_id: EntityId) -> &mut Pending {
        if !self.pending.contains_key(&entity_id) {
            self.order.push(entity_id);
        }
        self.pending.entry(entity_id).or_default()
    }

    fn forget(&mut self, entity_id: EntityId) {
        self.pending.remove(&entity_id);
        self.order.retain(|id| *id != entity_id);
    }
}
