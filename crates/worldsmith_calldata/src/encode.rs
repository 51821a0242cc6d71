//! The length-prefixed calldata encoding.
//!
//! Rules:
//! - A scalar encodes to itself.
//! - An empty sequence encodes to `[0]`.
//! - A sequence of `n` items encodes to `[n]` followed by its items. When
//!   the first item is itself a sequence or record, every item keeps its
//!   full encoding (inner prefixes included). When the first item is a
//!   scalar, the sequence is a flat list: nested sequences are spliced in
//!   without their own prefixes.
//! - A record encodes to the concatenation of its fields, without a prefix.
//! - All-digit text is a scalar, empty text is `0`, any other text becomes
//!   a [`ByteArray`].

use std::fmt;

use worldsmith_foundation::Felt;

use crate::text::ByteArray;
use crate::value::NestedValue;

/// One slot of encoded output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CalldataItem {
    /// A single felt.
    Felt(Felt),
    /// Chunked text, expanded to several felts by [`flatten`].
    Text(ByteArray),
}

impl CalldataItem {
    /// Returns the felt if this slot is a scalar.
    #[must_use]
    pub fn as_felt(&self) -> Option<Felt> {
        match self {
            Self::Felt(felt) => Some(*felt),
            Self::Text(_) => None,
        }
    }
}

impl From<Felt> for CalldataItem {
    fn from(value: Felt) -> Self {
        Self::Felt(value)
    }
}

impl From<u64> for CalldataItem {
    fn from(value: u64) -> Self {
        Self::Felt(Felt::from(value))
    }
}

impl fmt::Display for CalldataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Felt(felt) => write!(f, "{felt}"),
            Self::Text(text) => write!(f, "{:?}", text.to_string_lossy()),
        }
    }
}

/// Encodes a single value.
#[must_use]
pub fn encode(value: &NestedValue) -> Vec<CalldataItem> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

/// Encodes an argument list by concatenating each argument's encoding.
///
/// An empty argument list encodes to `[0]`.
#[must_use]
pub fn encode_args(args: &[NestedValue]) -> Vec<CalldataItem> {
    if args.is_empty() {
        return vec![CalldataItem::Felt(Felt::ZERO)];
    }
    let mut out = Vec::new();
    for arg in args {
        encode_into(arg, &mut out);
    }
    out
}

fn encode_into(value: &NestedValue, out: &mut Vec<CalldataItem>) {
    match value {
        NestedValue::Felt(felt) => out.push(CalldataItem::Felt(*felt)),
        NestedValue::Text(text) => out.push(encode_text(text)),
        NestedValue::Seq(items) => {
            out.push(CalldataItem::Felt(Felt::from(items.len())));
            let compound = matches!(
                items.first(),
                Some(NestedValue::Seq(_) | NestedValue::Record(_))
            );
            for item in items {
                if compound {
                    encode_into(item, out);
                } else {
                    splice_into(item, out);
                }
            }
        }
        NestedValue::Record(fields) => {
            for field in fields {
                encode_into(field, out);
            }
        }
    }
}

/// Flat-list mode: scalars are pushed, containers contribute their leaves.
fn splice_into(value: &NestedValue, out: &mut Vec<CalldataItem>) {
    match value {
        NestedValue::Felt(felt) => out.push(CalldataItem::Felt(*felt)),
        NestedValue::Text(text) => out.push(encode_text(text)),
        NestedValue::Seq(items) | NestedValue::Record(items) => {
            for item in items {
                splice_into(item, out);
            }
        }
    }
}

fn encode_text(text: &str) -> CalldataItem {
    if text.is_empty() {
        return CalldataItem::Felt(Felt::ZERO);
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        // Digit strings outside the field fall back to chunked text.
        if let Ok(felt) = Felt::from_dec_str(text) {
            if felt.is_field_element() {
                return CalldataItem::Felt(felt);
            }
        }
    }
    CalldataItem::Text(ByteArray::from_text(text))
}

/// Expands encoded slots into the wire-level felt sequence.
#[must_use]
pub fn flatten(items: &[CalldataItem]) -> Vec<Felt> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            CalldataItem::Felt(felt) => out.push(*felt),
            CalldataItem::Text(text) => out.extend(text.to_felts()),
        }
    }
    out
}
