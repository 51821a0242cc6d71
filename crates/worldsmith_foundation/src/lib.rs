//! Core types for Worldsmith.
//!
//! This crate provides:
//! - [`Felt`] - Unsigned 256-bit field element used for ids and calldata
//! - [`EntityId`] - Opaque entity identifiers and their generation
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod felt;

pub use entity::{EntityId, EntityIdGenerator};
pub use error::{Error, ErrorContext, ErrorKind};
pub use felt::Felt;

/// Result type alias using the Worldsmith [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
