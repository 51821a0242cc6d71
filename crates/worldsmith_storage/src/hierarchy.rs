//! Derived parent/child view of the graph.

use std::collections::{BTreeMap, BTreeSet};

use worldsmith_foundation::EntityId;

use crate::collection::EntityCollection;

/// Roots and parent → children edges, rebuilt from the pool on demand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hierarchy {
    roots: Vec<EntityId>,
    children: BTreeMap<EntityId, Vec<EntityId>>,
}

impl Hierarchy {
    /// Builds the view from a set of collections.
    ///
    /// Roots are real entities without a `ChildToParent`. Edges follow the
    /// parents' `ParentToChildren` lists, in listed order.
    pub fn build<'a>(collections: impl IntoIterator<Item = &'a EntityCollection>) -> Self {
        let mut roots = Vec::new();
        let mut children = BTreeMap::new();
        for collection in collections {
            let Some(id) = collection.entity_id() else {
                continue;
            };
            if collection.is_real() && collection.child_to_parent.is_none() {
                roots.push(id);
            }
            if let Some(ptc) = &collection.parent_to_children {
                children.insert(id, ptc.children.clone());
            }
        }
        roots.sort();
        Self { roots, children }
    }

    /// Real entities with no parent, ascending.
    #[must_use]
    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    /// Children of `parent`, empty if none.
    #[must_use]
    pub fn children(&self, parent: EntityId) -> &[EntityId] {
        self.children.get(&parent).map_or(&[], Vec::as_slice)
    }

    /// Depth-first walk from every root, yielding `(depth, id)`.
    ///
    /// An id already visited is not descended into again, so a malformed
    /// cyclic graph still terminates.
    #[must_use]
    pub fn walk(&self) -> Vec<(usize, EntityId)> {
        let mut out = Vec::new();
        let mut seen = BTreeSet::new();
        let mut stack: Vec<(usize, EntityId)> =
            self.roots.iter().rev().map(|id| (0, *id)).collect();
        while let Some((depth, id)) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            out.push((depth, id));
            for child in self.children(id).iter().rev() {
                stack.push((depth + 1, *child));
            }
        }
        out
    }
}
