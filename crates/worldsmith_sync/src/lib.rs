//! Change tracking, remote reconciliation and publishing for Worldsmith.
//!
//! This crate provides:
//! - [`ChangeTracker`] - Ordered queue of pending local changes
//! - [`ReconciliationFeed`] - Merges remote deliveries without tracking them
//! - [`Publisher`] and [`CallDispatcher`] - Sequential contract-call submission
//! - [`Editor`] - The session tying graph, tracker, feed and publisher together
//! - [`config`] - The persisted `dataPool` document

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod calls;
pub mod changes;
pub mod config;
pub mod editor;
pub mod feed;
pub mod publish;

pub use calls::{ContractCall, calls_for};
pub use changes::{Change, ChangeKind, ChangeTracker};
pub use config::{LoadedConfig, ValidationMessage};
pub use editor::{Editor, LogNotifier, Notifier};
pub use feed::{FeedEvent, FeedRecord, FeedStatus, ReconciliationFeed};
pub use publish::{CallDispatcher, PublishFailure, PublishReport, Publisher, RecordingDispatcher};
