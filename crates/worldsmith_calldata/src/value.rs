//! Nested value trees accepted by the encoder.

use worldsmith_foundation::{EntityId, Felt};

/// A value to be encoded into calldata.
///
/// The encoder treats each variant uniformly and knows nothing about which
/// record shape produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NestedValue {
    /// Integer-like scalar.
    Felt(Felt),
    /// Free text; all-digit text is treated as a scalar.
    Text(String),
    /// Variable-length sequence, length-prefixed on the wire.
    Seq(Vec<NestedValue>),
    /// Fixed-shape record: its field values in declared order.
    Record(Vec<NestedValue>),
}

impl NestedValue {
    /// Creates a scalar from an unsigned integer.
    #[must_use]
    pub fn int(value: u64) -> Self {
        Self::Felt(Felt::from(value))
    }

    /// Creates a sequence from any iterator of convertible items.
    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NestedValue>,
    {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Returns true if this is an empty sequence.
    #[must_use]
    pub fn is_empty_seq(&self) -> bool {
        matches!(self, Self::Seq(items) if items.is_empty())
    }
}

impl From<Felt> for NestedValue {
    fn from(value: Felt) -> Self {
        Self::Felt(value)
    }
}

impl From<EntityId> for NestedValue {
    fn from(value: EntityId) -> Self {
        Self::Felt(value.felt())
    }
}

impl From<bool> for NestedValue {
    fn from(value: bool) -> Self {
        Self::Felt(Felt::from(value))
    }
}

impl From<u32> for NestedValue {
    fn from(value: u32) -> Self {
        Self::Felt(Felt::from(value))
    }
}

impl From<u64> for NestedValue {
    fn from(value: u64) -> Self {
        Self::Felt(Felt::from(value))
    }
}

impl From<&str> for NestedValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NestedValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<NestedValue>> From<Vec<T>> for NestedValue {
    fn from(value: Vec<T>) -> Self {
        Self::seq(value)
    }
}

/// Conversion of a typed value into its calldata tree.
///
/// Records implement this by listing their fields in declared order; the
/// encoder never inspects field names.
pub trait ToCalldata {
    /// Returns the value as a nested calldata tree.
    fn to_calldata(&self) -> NestedValue;
}

impl ToCalldata for Felt {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Felt(*self)
    }
}

impl ToCalldata for EntityId {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Felt(self.felt())
    }
}

impl ToCalldata for bool {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::from(*self)
    }
}

impl ToCalldata for u32 {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::from(*self)
    }
}

impl ToCalldata for String {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Text(self.clone())
    }
}

impl<T: ToCalldata> ToCalldata for Vec<T> {
    fn to_calldata(&self) -> NestedValue {
        NestedValue::Seq(self.iter().map(ToCalldata::to_calldata).collect())
    }
}
