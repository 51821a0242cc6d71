//! Components, entity collections and the entity graph store for Worldsmith.
//!
//! This crate provides:
//! - [`Component`] and [`ComponentKind`] - The closed set of component records
//! - [`EntityCollection`] - All components of one entity, or a partial update
//! - [`EntityGraph`] - The data pool with parent/child cascades
//! - [`Hierarchy`] - Roots and parent → children view

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collection;
pub mod component;
pub mod graph;
pub mod hierarchy;

pub use collection::EntityCollection;
pub use component::{
    Area, AreaType, ChildToParent, Component, ComponentKind, Container, DirectionType, Entity,
    Exit, Inspectable, InventoryItem, ParentToChildren, Player,
};
pub use graph::{Cascade, DeletedComponent, EntityGraph, MergeOutcome, RemovedEntity};
pub use hierarchy::Hierarchy;
