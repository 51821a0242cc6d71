//! Remote reconciliation feed.
//!
//! The authoritative remote pushes records grouped by namespace and component
//! name. Records are merged into the graph directly: remote state is never
//! fed back into the change tracker.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use worldsmith_storage::{Component, ComponentKind, EntityCollection, EntityGraph, MergeOutcome};

/// Component name that marks dictionary data, which this store does not hold.
pub const DICT_MODEL: &str = "Dict";

/// One pushed record: `namespace → component name → payload`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedRecord {
    /// Payloads grouped by namespace.
    pub models: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
}

impl FeedRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record with one more payload.
    #[must_use]
    pub fn with(
        mut self,
        namespace: impl Into<String>,
        component: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        self.models
            .entry(namespace.into())
            .or_default()
            .insert(component.into(), payload);
        self
    }

    /// True if any namespace carries dictionary data.
    #[must_use]
    pub fn has_dict(&self) -> bool {
        self.models.values().any(|m| m.contains_key(DICT_MODEL))
    }

    /// Decodes the payloads into a partial collection.
    ///
    /// Unknown component names and payloads that do not decode are logged and
    /// skipped.
    #[must_use]
    pub fn to_collection(&self) -> EntityCollection {
        let mut collection = EntityCollection::new();
        for (namespace, models) in &self.models {
            for (name, payload) in models {
                let kind: ComponentKind = match name.parse() {
                    Ok(kind) => kind,
                    Err(_) => {
                        warn!(%namespace, component = %name, "feed skipped unknown component");
                        continue;
                    }
                };
                match Component::from_json(kind, payload.clone()) {
                    Ok(component) => {
                        collection.set(component);
                    }
                    Err(error) => {
                        warn!(%namespace, component = %name, %error, "feed skipped undecodable payload");
                    }
                }
            }
        }
        collection
    }
}

/// One delivery from the remote subscription.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedEvent {
    /// Records pushed, if any.
    #[serde(default)]
    pub data: Option<Vec<FeedRecord>>,
    /// Subscription failure, if any.
    #[serde(default)]
    pub error: Option<String>,
}

impl FeedEvent {
    /// A delivery of records.
    #[must_use]
    pub fn records(records: Vec<FeedRecord>) -> Self {
        Self {
            data: Some(records),
            error: None,
        }
    }

    /// A subscription failure.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Subscription state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FeedStatus {
    /// Records are being merged.
    #[default]
    Live,
    /// The subscription reported an error; records are ignored until
    /// [`ReconciliationFeed::recover`].
    Errored(String),
}

/// Merges remote records into the graph.
#[derive(Clone, Debug, Default)]
pub struct ReconciliationFeed {
    status: FeedStatus,
    applied: u64,
}

impl ReconciliationFeed {
    /// Creates a live feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    /// True if records are being merged.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.status == FeedStatus::Live
    }

    /// Total records merged since creation.
    #[must_use]
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Merges one record. Records carrying dictionary data are dropped.
    pub fn apply(&mut self, graph: &mut EntityGraph, record: &FeedRecord) -> Option<MergeOutcome> {
        if record.has_dict() {
            debug!("feed dropped dictionary record");
            return None;
        }
        let outcome = graph.merge(record.to_collection())?;
        self.applied += 1;
        debug!(entity_id = %outcome.entity_id, changed = ?outcome.changed, "feed merged record");
        Some(outcome)
    }

    /// Handles one delivery, returning the number of records merged.
    pub fn handle(&mut self, graph: &mut EntityGraph, event: &FeedEvent) -> usize {
        if let Some(message) = &event.error {
            warn!(%message, "feed errored");
            self.status = FeedStatus::Errored(message.clone());
            return 0;
        }
        if let FeedStatus::Errored(message) = &self.status {
            debug!(%message, "feed ignored delivery while errored");
            return 0;
        }
        event
            .data
            .iter()
            .flatten()
            .filter_map(|record| self.apply(graph, record))
            .count()
    }

    /// Resumes merging after an error.
    pub fn recover(&mut self) {
        if !self.is_live() {
            debug!("feed recovered");
        }
        self.status = FeedStatus::Live;
    }
}
