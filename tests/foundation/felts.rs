//! Integration tests for Felt parsing, formatting and ordering

use worldsmith_foundation::{ErrorKind, Felt};

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn decimal_and_hex_agree() {
    let dec: Felt = "3735928559".parse().unwrap();
    let hex: Felt = "0xdeadbeef".parse().unwrap();
    assert_eq!(dec, hex);
    assert_eq!(dec.to_u64(), Some(0xdead_beef));
}

#[test]
fn max_value_parses() {
    let max = format!("0x{}", "f".repeat(64));
    let felt: Felt = max.parse().unwrap();
    assert_eq!(felt.bits(), 256);
}

#[test]
fn overflow_is_rejected() {
    let too_big = format!("0x1{}", "0".repeat(64));
    let err = too_big.parse::<Felt>().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidFelt { .. }));

    // 2^256 in decimal.
    let err = Felt::from_dec_str(
        "115792089237316195423570985008687907853269984665640564039457584007913129639936",
    )
    .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidFelt { .. }));
}

#[test]
fn garbage_is_rejected() {
    for input in ["", "12a", "-1", "0xzz", "1.5"] {
        assert!(input.parse::<Felt>().is_err(), "{input:?} parsed");
    }
}

// =============================================================================
// Formatting and Ordering
// =============================================================================

#[test]
fn formats_decimal_and_hex() {
    let felt = Felt::from(255u64);
    assert_eq!(felt.to_string(), "255");
    assert_eq!(format!("{felt:x}"), "ff");
    assert_eq!(format!("{felt:#x}"), "0xff");
    assert_eq!(format!("{:#x}", Felt::ZERO), "0x0");
}

#[test]
fn ordering_is_numeric() {
    let nine: Felt = "9".parse().unwrap();
    let ten: Felt = "10".parse().unwrap();
    assert!(nine < ten);

    let big: Felt = "340282366920938463463374607431768211456".parse().unwrap();
    assert!(Felt::from(u128::MAX) < big);
}

#[test]
fn serde_round_trip() {
    let felt = Felt::from(0x1234u64);
    let json = serde_json::to_string(&felt).unwrap();
    assert_eq!(json, "\"0x1234\"");
    let back: Felt = serde_json::from_str(&json).unwrap();
    assert_eq!(back, felt);

    let from_int: Felt = serde_json::from_str("4660").unwrap();
    assert_eq!(from_int, felt);
    let from_dec: Felt = serde_json::from_str("\"4660\"").unwrap();
    assert_eq!(from_dec, felt);
}
