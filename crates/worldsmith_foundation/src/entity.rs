//! Entity identifiers.
//!
//! Ids are generated client-side: a random 16-digit decimal value is hashed
//! into the contract's field range, so two editors never hand out the same
//! identifier without coordinating.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sha2::{Digest, Sha256};

use crate::error::Error;
use crate::felt::Felt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bits kept from the id digest; ids must fit the contract field.
pub const ENTITY_ID_BITS: u32 = 251;

const SEED_DIGITS_MIN: u64 = 1_000_000_000_000_000;
const SEED_DIGITS_MAX: u64 = 9_999_999_999_999_999;

/// Opaque identifier of an entity.
///
/// Immutable once created. Ordering is numeric.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct EntityId(pub Felt);

impl EntityId {
    /// Creates an entity id from a felt.
    #[must_use]
    pub const fn new(felt: Felt) -> Self {
        Self(felt)
    }

    /// Returns the underlying felt.
    #[must_use]
    pub const fn felt(self) -> Felt {
        self.0
    }

    /// Generates a fresh identifier from the given random source.
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let seed: u64 = rng.gen_range(SEED_DIGITS_MIN..=SEED_DIGITS_MAX);
        Self::from_seed_digits(seed)
    }

    /// Hashes a 16-digit seed into the identifier space.
    #[must_use]
    pub fn from_seed_digits(seed: u64) -> Self {
        let digest = Sha256::digest(seed.to_string().as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(Felt::from_be_bytes(bytes).truncate_bits(ENTITY_ID_BITS))
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(Felt::from(value))
    }
}

impl From<Felt> for EntityId {
    fn from(value: Felt) -> Self {
        Self(value)
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        s.parse().map(Self)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({:#x})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({:#x})", self.0)
    }
}

/// Source of fresh entity ids.
///
/// Production editors seed from OS entropy; tests seed explicitly so id
/// sequences are reproducible.
#[derive(Debug, Clone)]
pub struct EntityIdGenerator {
    rng: ChaCha20Rng,
}

impl EntityIdGenerator {
    /// Creates a generator with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Returns the next id.
    pub fn next_id(&mut self) -> EntityId {
        EntityId::generate(&mut self.rng)
    }
}

impl Default for EntityIdGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
