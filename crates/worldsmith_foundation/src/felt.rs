//! Unsigned 256-bit field elements.
//!
//! Identifiers and calldata words exceed the native integer range, so they
//! are carried as 32 big-endian bytes. Byte-wise ordering of a fixed-width
//! big-endian buffer is numeric ordering, which is what `Ord` derives.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// Width of a felt in bytes.
pub const FELT_BYTES: usize = 32;

/// Unsigned 256-bit integer, stored big-endian.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Felt([u8; FELT_BYTES]);

impl Felt {
    /// The value zero.
    pub const ZERO: Self = Self([0; FELT_BYTES]);

    /// The value one.
    pub const ONE: Self = {
        let mut bytes = [0; FELT_BYTES];
        bytes[FELT_BYTES - 1] = 1;
        Self(bytes)
    };

    /// The contract field prime, `2^251 + 17 * 2^192 + 1`.
    pub const MODULUS: Self = {
        let mut bytes = [0; FELT_BYTES];
        bytes[0] = 0x08;
        bytes[7] = 0x11;
        bytes[FELT_BYTES - 1] = 1;
        Self(bytes)
    };

    /// Creates a felt from 32 big-endian bytes.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; FELT_BYTES]) -> Self {
        Self(bytes)
    }

    /// Creates a felt from up to 32 big-endian bytes.
    ///
    /// Returns `None` if the slice is longer than 32 bytes.
    #[must_use]
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > FELT_BYTES {
            return None;
        }
        let mut out = [0; FELT_BYTES];
        out[FELT_BYTES - bytes.len()..].copy_from_slice(bytes);
        Some(Self(out))
    }

    /// Returns the 32 big-endian bytes of this felt.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; FELT_BYTES] {
        self.0
    }

    /// Returns true if the contract accepts this value as a field element.
    #[must_use]
    pub fn is_field_element(&self) -> bool {
        *self < Self::MODULUS
    }

    /// Returns true if this felt is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Number of significant bits.
    #[must_use]
    pub fn bits(&self) -> u32 {
        let Some(first) = self.0.iter().position(|b| *b != 0) else {
            return 0;
        };
        #[allow(clippy::cast_possible_truncation)]
        let trailing_bytes = (FELT_BYTES - first - 1) as u32;
        trailing_bytes * 8 + (8 - self.0[first].leading_zeros())
    }

    /// Returns the value as `u64` if it fits.
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[..FELT_BYTES - 8].iter().any(|b| *b != 0) {
            return None;
        }
        let mut tail = [0; 8];
        tail.copy_from_slice(&self.0[FELT_BYTES - 8..]);
        Some(u64::from_be_bytes(tail))
    }

    /// Keeps only the lowest `bits` bits.
    #[must_use]
    pub fn truncate_bits(mut self, bits: u32) -> Self {
        for (i, byte) in self.0.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let low_bit = ((FELT_BYTES - 1 - i) * 8) as u32;
            if low_bit >= bits {
                *byte = 0;
            } else if low_bit + 8 > bits {
                *byte &= (1u8 << (bits - low_bit)) - 1;
            }
        }
        self
    }

    /// Parses a string of ASCII decimal digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is empty, contains a non-digit, or
    /// the value does not fit in 256 bits.
    pub fn from_dec_str(s: &str) -> crate::Result<Self> {
        if s.is_empty() {
            return Err(invalid(s, "empty decimal string"));
        }
        let mut bytes = [0u8; FELT_BYTES];
        for c in s.bytes() {
            if !c.is_ascii_digit() {
                return Err(invalid(s, "non-digit character"));
            }
            if mul_add(&mut bytes, 10, u32::from(c - b'0')) != 0 {
                return Err(invalid(s, "value exceeds 256 bits"));
            }
        }
        Ok(Self(bytes))
    }

    /// Parses a hex string, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the string has no digits, contains a non-hex
    /// character, or the value does not fit in 256 bits.
    pub fn from_hex_str(s: &str) -> crate::Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(invalid(s, "empty hex string"));
        }
        let digits = digits.trim_start_matches('0');
        if digits.len() > FELT_BYTES * 2 {
            return Err(invalid(s, "value exceeds 256 bits"));
        }
        let mut bytes = [0u8; FELT_BYTES];
        for (i, c) in digits.bytes().rev().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let nibble = (c as char)
                .to_digit(16)
                .ok_or_else(|| invalid(s, "non-hex character"))? as u8;
            let byte = &mut bytes[FELT_BYTES - 1 - i / 2];
            *byte |= if i % 2 == 0 { nibble } else { nibble << 4 };
        }
        Ok(Self(bytes))
    }

    fn to_dec_string(self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut bytes = self.0;
        let mut digits = Vec::new();
        while bytes.iter().any(|b| *b != 0) {
            let rem = div_rem(&mut bytes, 10);
            #[allow(clippy::cast_possible_truncation)]
            digits.push(b'0' + rem as u8);
        }
        digits.reverse();
        String::from_utf8(digits).unwrap_or_default()
    }

    fn to_hex_string(self) -> String {
        let hex: String = self.0.iter().map(|b| format!("{b:02x}")).collect();
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// In-place `bytes = bytes * mul + add`; returns the carry out of the top byte.
fn mul_add(bytes: &mut [u8; FELT_BYTES], mul: u32, add: u32) -> u32 {
    let mut carry = add;
    for byte in bytes.iter_mut().rev() {
        let v = u32::from(*byte) * mul + carry;
        #[allow(clippy::cast_possible_truncation)]
        {
            *byte = v as u8;
        }
        carry = v >> 8;
    }
    carry
}

/// In-place `bytes = bytes / div`; returns the remainder.
fn div_rem(bytes: &mut [u8; FELT_BYTES], div: u32) -> u32 {
    let mut rem = 0u32;
    for byte in bytes.iter_mut() {
        let v = (rem << 8) | u32::from(*byte);
        #[allow(clippy::cast_possible_truncation)]
        {
            *byte = (v / div) as u8;
        }
        rem = v % div;
    }
    rem
}

fn invalid(input: &str, reason: &str) -> Error {
    Error::new(ErrorKind::InvalidFelt {
        input: input.to_string(),
        reason: reason.to_string(),
    })
}

impl From<u64> for Felt {
    fn from(value: u64) -> Self {
        Self::from(u128::from(value))
    }
}

impl From<u32> for Felt {
    fn from(value: u32) -> Self {
        Self::from(u128::from(value))
    }
}

impl From<u128> for Felt {
    fn from(value: u128) -> Self {
        let mut bytes = [0; FELT_BYTES];
        bytes[FELT_BYTES - 16..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }
}

impl From<bool> for Felt {
    fn from(value: bool) -> Self {
        if value { Self::ONE } else { Self::ZERO }
    }
}

impl From<usize> for Felt {
    fn from(value: usize) -> Self {
        Self::from(value as u64)
    }
}

impl FromStr for Felt {
    type Err = Error;

    /// Parses `0x`-prefixed hex, otherwise decimal.
    fn from_str(s: &str) -> crate::Result<Self> {
        if s.starts_with("0x") || s.starts_with("0X") {
            Self::from_hex_str(s)
        } else {
            Self::from_dec_str(s)
        }
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "", &self.to_dec_string())
    }
}

impl fmt::LowerHex for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad_integral(true, "0x", &self.to_hex_string())
    }
}

impl fmt::Debug for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Felt({self:#x})")
    }
}

#[cfg(feature = "serde")]
mod serde_support {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Felt;

    impl Serialize for Felt {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&format!("{self:#x}"))
        }
    }

    impl<'de> Deserialize<'de> for Felt {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct FeltVisitor;

            impl Visitor<'_> for FeltVisitor {
                type Value = Felt;

                fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                    formatter.write_str("a decimal string, a 0x-prefixed hex string, or an unsigned integer")
                }

                fn visit_str<E>(self, v: &str) -> Result<Felt, E>
                where
                    E: de::Error,
                {
                    v.parse().map_err(E::custom)
                }

                fn visit_u64<E>(self, v: u64) -> Result<Felt, E>
                where
                    E: de::Error,
                {
                    Ok(Felt::from(v))
                }

                fn visit_i64<E>(self, v: i64) -> Result<Felt, E>
                where
                    E: de::Error,
                {
                    u64::try_from(v)
                        .map(Felt::from)
                        .map_err(|_| E::custom(format!("negative felt: {v}")))
                }
            }

            deserializer.deserialize_any(FeltVisitor)
        }
    }
}
