//! Integration tests for Layer 3: Sync
//!
//! Tests for change tracking, the remote feed, publishing, config files,
//! and end-to-end editor sessions.

mod config;
mod feed;
mod scenarios;
