//! The editor session.
//!
//! `Editor` ties the graph, the change tracker, the remote feed and the
//! publisher together. Local edits go through the editor so they are both
//! applied and tracked; remote deliveries go through [`Editor::apply_remote`]
//! and are applied without tracking.

use std::path::Path;

use tracing::{debug, info, warn};
use worldsmith_foundation::{EntityId, EntityIdGenerator, Error, Result};
use worldsmith_storage::{
    Cascade, ChildToParent, Component, ComponentKind, Entity, EntityCollection, EntityGraph,
    Hierarchy, MergeOutcome, ParentToChildren, RemovedEntity,
};

use crate::changes::{Change, ChangeTracker};
use crate::config::{self, ValidationMessage};
use crate::feed::{FeedEvent, ReconciliationFeed};
use crate::publish::{CallDispatcher, PublishFailure, Publisher};

/// Receives session notifications meant for the user.
pub trait Notifier {
    /// A change could not be published and was requeued.
    fn publish_failed(&mut self, failure: &PublishFailure);

    /// Whether unpublished local changes remain.
    fn dirty(&mut self, dirty: bool);
}

/// Notifier that only logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn publish_failed(&mut self, failure: &PublishFailure) {
        warn!(entity_id = %failure.change.entity_id, error = %failure.error, "change requeued");
    }

    fn dirty(&mut self, dirty: bool) {
        debug!(dirty, "dirty state");
    }
}

/// An editing session over one entity graph.
#[derive(Debug)]
pub struct Editor<N: Notifier = LogNotifier> {
    graph: EntityGraph,
    tracker: ChangeTracker,
    feed: ReconciliationFeed,
    publisher: Publisher,
    ids: EntityIdGenerator,
    notifier: N,
}

impl Editor<LogNotifier> {
    /// Creates an empty session with entropy-seeded ids.
    #[must_use]
    pub fn new() -> Self {
        Self::with_notifier(LogNotifier)
    }
}

impl Default for Editor<LogNotifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Notifier> Editor<N> {
    /// Creates an empty session reporting to `notifier`.
    pub fn with_notifier(notifier: N) -> Self {
        Self {
            graph: EntityGraph::new(),
            tracker: ChangeTracker::new(),
            feed: ReconciliationFeed::new(),
            publisher: Publisher::new(),
            ids: EntityIdGenerator::from_entropy(),
            notifier,
        }
    }

    /// Replaces the id generator, e.g. with a seeded one.
    #[must_use]
    pub fn with_ids(mut self, ids: EntityIdGenerator) -> Self {
        self.ids = ids;
        self
    }

    /// The graph.
    #[must_use]
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    /// The graph's parent/child hierarchy, rebuilt if stale.
    pub fn hierarchy(&mut self) -> &Hierarchy {
        self.graph.hierarchy()
    }

    /// The change tracker.
    #[must_use]
    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    /// The remote feed.
    #[must_use]
    pub fn feed(&self) -> &ReconciliationFeed {
        &self.feed
    }

    /// The notifier.
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// True if unpublished local changes exist.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.tracker.is_empty()
    }

    /// Drains pending changes without publishing them.
    pub fn take_changes(&mut self) -> Vec<Change> {
        self.tracker.drain()
    }

    // --- Local edits ---

    /// Creates a real entity with a fresh id.
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        let inst = self.ids.next_id();
        self.edit(EntityCollection::new().with(Entity {
            inst,
            is_entity: true,
            name: name.into(),
            alt_names: Vec::new(),
        }));
        info!(entity_id = %inst, "created entity");
        inst
    }

    /// Applies a local partial edit and records the components that changed.
    pub fn edit(&mut self, partial: EntityCollection) -> Option<MergeOutcome> {
        let outcome = self.graph.merge(partial)?;
        if !outcome.is_unchanged() {
            let target = self
                .graph
                .get(outcome.entity_id)
                .map(|c| c.select(&outcome.changed))
                .unwrap_or_default();
            self.tracker.record_update(outcome.entity_id, target);
        }
        Some(outcome)
    }

    /// Writes one component.
    pub fn set_component(&mut self, component: impl Into<Component>) -> Option<MergeOutcome> {
        self.edit(EntityCollection::from(component.into()))
    }

    /// Removes one component and records it with its cascades.
    ///
    /// Detached children are recorded before the removal and parent list
    /// changes after it, so a parent never publishes a list naming a child
    /// that still points elsewhere.
    ///
    /// # Errors
    ///
    /// See [`EntityGraph::remove_component`].
    pub fn remove_component(&mut self, id: EntityId, kind: ComponentKind) -> Result<()> {
        let removed = self.graph.component(id, kind);
        let cascades = self.graph.remove_component(id, kind)?;
        let (detached, parents) = split_cascades(cascades);
        self.record_cascades(detached);
        if let Some(component) = removed {
            self.tracker.record_delete(id, component.into());
        }
        self.record_cascades(parents);
        Ok(())
    }

    /// Removes an entity and records the removal with its cascades.
    ///
    /// Ordered as in [`remove_component`](Self::remove_component): children
    /// first, then the entity, then its parent's list.
    ///
    /// # Errors
    ///
    /// See [`EntityGraph::remove_entity`].
    pub fn remove_entity(&mut self, id: EntityId) -> Result<RemovedEntity> {
        let removed = self.graph.remove_entity(id)?;
        let (detached, parents) = split_cascades(removed.cascades.clone());
        self.record_cascades(detached);
        self.tracker.record_removal(id, removed.collection.clone());
        self.record_cascades(parents);
        info!(entity_id = %id, "removed entity");
        Ok(removed)
    }

    /// Makes `child` a child of `parent`, writing both relation components.
    ///
    /// # Errors
    ///
    /// `EntityNotFound` if either is absent, `InvalidOperation` if the child
    /// already has a different parent or the two ids are equal.
    pub fn attach_child(&mut self, parent: EntityId, child: EntityId) -> Result<()> {
        if parent == child {
            return Err(Error::invalid_operation(format!("{child} cannot parent itself")));
        }
        let parent_collection = self
            .graph
            .get(parent)
            .ok_or_else(|| Error::entity_not_found(parent))?;
        let child_collection = self
            .graph
            .get(child)
            .ok_or_else(|| Error::entity_not_found(child))?;
        if let Some(link) = &child_collection.child_to_parent {
            if link.parent == parent {
                return Ok(());
            }
            return Err(Error::invalid_operation(format!(
                "{child} already has parent {}",
                link.parent
            )));
        }

        let mut children = parent_collection
            .parent_to_children
            .as_ref()
            .map(|p| p.children.clone())
            .unwrap_or_default();
        if !children.contains(&child) {
            children.push(child);
        }
        self.set_component(ParentToChildren {
            inst: parent,
            is_parent: true,
            children,
        });
        self.set_component(ChildToParent {
            inst: child,
            is_child: true,
            parent,
        });
        Ok(())
    }

    fn record_cascades(&mut self, cascades: Vec<Cascade>) {
        for cascade in cascades {
            match cascade {
                Cascade::ChildrenUpdated { parent, component } => {
                    self.tracker
                        .record_update(parent, EntityCollection::new().with(component));
                }
                Cascade::ChildrenRemoved { parent, component } => {
                    self.tracker
                        .record_delete(parent, EntityCollection::new().with(component));
                }
                Cascade::ChildDetached { child, component } => {
                    self.tracker
                        .record_delete(child, EntityCollection::new().with(component));
                }
            }
        }
    }

    // --- Remote ---

    /// Applies a remote delivery without tracking it.
    pub fn apply_remote(&mut self, event: &FeedEvent) -> usize {
        self.feed.handle(&mut self.graph, event)
    }

    /// Resumes the feed after an error.
    pub fn recover_feed(&mut self) {
        self.feed.recover();
    }

    // --- Publishing ---

    /// Publishes everything pending. Returns true if all of it went out.
    pub async fn publish<D: CallDispatcher>(&mut self, dispatcher: &mut D) -> bool {
        let changes = self.tracker.drain();
        self.publish_changes(dispatcher, changes).await
    }

    /// Publishes the given changes, requeueing failures.
    pub async fn publish_changes<D: CallDispatcher>(
        &mut self,
        dispatcher: &mut D,
        changes: Vec<Change>,
    ) -> bool {
        let mut report = self.publisher.publish(dispatcher, changes).await;
        for failure in &report.failed {
            self.notifier.publish_failed(failure);
        }
        let success = report.is_success();
        self.tracker.requeue(report.take_failed_changes());
        let dirty = self.is_dirty();
        self.notifier.dirty(dirty);
        success
    }

    // --- Config ---

    /// Merges a config document into the graph without tracking.
    ///
    /// # Errors
    ///
    /// A validation error if the document is not a config envelope.
    pub fn load_config(&mut self, json: &str) -> Result<Vec<ValidationMessage>> {
        let loaded = config::load(json)?;
        Ok(self.import(loaded))
    }

    /// Reads and merges a config file without tracking.
    ///
    /// # Errors
    ///
    /// I/O and validation errors.
    pub fn load_config_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<ValidationMessage>> {
        let loaded = config::load_file(path)?;
        Ok(self.import(loaded))
    }

    /// Serializes the real entities as a config document.
    ///
    /// # Errors
    ///
    /// Serialization errors.
    pub fn save_config(&self) -> Result<String> {
        config::save(&self.graph)
    }

    fn import(&mut self, loaded: config::LoadedConfig) -> Vec<ValidationMessage> {
        let count = loaded.data_pool.len();
        for collection in loaded.data_pool {
            self.graph.merge(collection);
        }
        info!(entries = count, skipped = loaded.messages.len(), "config loaded");
        loaded.messages
    }
}

/// Splits cascades into detached children and parent list changes.
fn split_cascades(cascades: Vec<Cascade>) -> (Vec<Cascade>, Vec<Cascade>) {
    cascades
        .into_iter()
        .partition(|c| matches!(c, Cascade::ChildDetached { .. }))
}
