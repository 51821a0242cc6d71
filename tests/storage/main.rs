//! Integration tests for Layer 2: Storage
//!
//! Tests for entity collections, merging, parent/child cascades, and the
//! hierarchy view.

mod common;
mod entities;
mod merging;
