//! Worldsmith - Entity graph editor core
//!
//! This crate re-exports all layers of the Worldsmith system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: worldsmith_sync       — Change tracking, remote feed, publishing, config
//! Layer 2: worldsmith_storage    — Components, entity collections, entity graph
//! Layer 1: worldsmith_calldata   — Nested values, chunked text, calldata encoder
//! Layer 0: worldsmith_foundation — Core types (Felt, EntityId, Error)
//! ```

pub use worldsmith_calldata as calldata;
pub use worldsmith_foundation as foundation;
pub use worldsmith_storage as storage;
pub use worldsmith_sync as sync;
