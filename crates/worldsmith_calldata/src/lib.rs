//! Nested values and the calldata encoder for Worldsmith.
//!
//! This crate provides:
//! - [`NestedValue`] - Arbitrarily nested scalars, text, sequences and records
//! - [`ByteArray`] - Text chunked into fixed-width words
//! - [`encode`] / [`encode_args`] - The length-prefixed flat encoding
//! - [`flatten`] - The final wire form as a felt sequence
//! - [`ToCalldata`] - Field-ordered conversion for typed records

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod encode;
pub mod text;
pub mod value;

pub use encode::{CalldataItem, encode, encode_args, flatten};
pub use text::{ByteArray, WORD_BYTES};
pub use value::{NestedValue, ToCalldata};
