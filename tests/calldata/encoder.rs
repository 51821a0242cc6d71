//! Integration tests for the nested-value encoder

use worldsmith_calldata::{ByteArray, CalldataItem, NestedValue, WORD_BYTES, encode, encode_args, flatten};
use worldsmith_foundation::Felt;

fn felts(values: &[u64]) -> Vec<CalldataItem> {
    values.iter().map(|v| CalldataItem::from(*v)).collect()
}

fn int(v: u64) -> NestedValue {
    NestedValue::int(v)
}

fn seq(items: Vec<NestedValue>) -> NestedValue {
    NestedValue::Seq(items)
}

// =============================================================================
// Sequences
// =============================================================================

#[test]
fn empty_sequence_is_single_zero() {
    assert_eq!(encode(&seq(vec![])), felts(&[0]));
}

#[test]
fn one_zero_and_one_empty_sequence_coincide() {
    // Both are `[1, 0]` on the wire; the format is one-way.
    let one_zero = encode(&seq(vec![int(0)]));
    let one_empty = encode(&seq(vec![seq(vec![])]));
    assert_eq!(one_zero, felts(&[1, 0]));
    assert_eq!(one_empty, felts(&[1, 0]));
}

#[test]
fn flat_and_nested_sequences() {
    assert_eq!(encode(&NestedValue::seq([1u64, 2, 3])), felts(&[3, 1, 2, 3]));
    assert_eq!(
        encode(&seq(vec![int(1), NestedValue::seq([2u64, 3]), int(4)])),
        felts(&[3, 1, 2, 3, 4])
    );
    assert_eq!(
        encode(&seq(vec![NestedValue::seq([1u64, 2]), NestedValue::seq([3u64, 4])])),
        felts(&[2, 2, 1, 2, 2, 3, 4])
    );
}

#[test]
fn argument_lists() {
    assert_eq!(encode_args(&[]), felts(&[0]));
    assert_eq!(
        encode_args(&[int(9), NestedValue::seq([1u64, 2])]),
        felts(&[9, 2, 1, 2])
    );
}

// =============================================================================
// Text
// =============================================================================

#[test]
fn text_rules() {
    assert_eq!(encode(&NestedValue::from("")), felts(&[0]));
    assert_eq!(encode(&NestedValue::from("123")), felts(&[123]));
    assert!(matches!(
        encode(&NestedValue::from("abc"))[0],
        CalldataItem::Text(_)
    ));
}

#[test]
fn full_word_text() {
    let text = "x".repeat(WORD_BYTES);
    let chunked = ByteArray::from_text(&text);
    assert_eq!(chunked.data.len(), 1);
    assert_eq!(chunked.pending_word, Felt::ZERO);
    assert_eq!(chunked.pending_word_len, 0);
    assert_eq!(flatten(&encode(&NestedValue::from(text.as_str()))).len(), 4);
}

#[test]
fn text_inside_sequence_flattens_in_place() {
    let value = seq(vec![NestedValue::from("ab"), NestedValue::from("cd")]);
    let wire = flatten(&encode(&value));
    assert_eq!(
        wire,
        vec![
            Felt::from(2u64),
            Felt::ZERO,
            Felt::from(0x6162u64),
            Felt::from(2u64),
            Felt::ZERO,
            Felt::from(0x6364u64),
            Felt::from(2u64),
        ]
    );
}
