//! Integration tests for Layer 1: Calldata
//!
//! Tests for the length-prefixed encoder, chunked text, and component
//! encodings.

mod components;
mod encoder;
