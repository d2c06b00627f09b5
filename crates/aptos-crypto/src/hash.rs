// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Domain-separated cryptographic hashing.
//!
//! Every signable type gets its own hasher whose state is seeded with
//! `SHA3-256("APTOS::<TypeName>")`. The seed keeps the signing transcript of
//! one type from ever colliding with another's: the bytes signed for a
//! transaction are `seed || BCS(value)`, and the seed pins the type.

use once_cell::sync::Lazy;
use serde::{de, ser, Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::{
    fmt,
    str::FromStr,
};

/// Output of the hash function, 32 bytes.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct HashValue {
    hash: [u8; HashValue::LENGTH],
}

impl HashValue {
    /// Length of a hash, in bytes.
    pub const LENGTH: usize = 32;

    pub fn new(hash: [u8; HashValue::LENGTH]) -> Self {
        HashValue { hash }
    }

    pub fn zero() -> Self {
        HashValue {
            hash: [0; HashValue::LENGTH],
        }
    }

    pub fn from_slice<T: AsRef<[u8]>>(bytes: T) -> Result<Self, HashValueParseError> {
        <[u8; Self::LENGTH]>::try_from(bytes.as_ref())
            .map(Self::new)
            .map_err(|_| HashValueParseError)
    }

    /// SHA3-256 of the given bytes.
    pub fn sha3_256_of(buffer: &[u8]) -> Self {
        let mut digest = Sha3_256::new();
        digest.update(buffer);
        HashValue::new(digest.finalize().into())
    }

    /// SHA3-256 over the concatenation of all slices in the iterator.
    pub fn from_iter_sha3<'a>(buffers: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut digest = Sha3_256::new();
        for buffer in buffers {
            digest.update(buffer);
        }
        HashValue::new(digest.finalize().into())
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.hash.to_vec()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// `0x`-prefixed lowercase hex, the node's rendering of hashes.
    pub fn to_hex_literal(&self) -> String {
        format!("0x{}", self.to_hex())
    }

    pub fn from_hex<T: AsRef<[u8]>>(hex_str: T) -> Result<Self, HashValueParseError> {
        let bytes = hex::decode(hex_str).map_err(|_| HashValueParseError)?;
        Self::from_slice(bytes)
    }

    /// Parses hex with or without a leading `0x`.
    pub fn from_hex_literal(literal: &str) -> Result<Self, HashValueParseError> {
        Self::from_hex(literal.strip_prefix("0x").unwrap_or(literal))
    }
}

impl AsRef<[u8; HashValue::LENGTH]> for HashValue {
    fn as_ref(&self) -> &[u8; HashValue::LENGTH] {
        &self.hash
    }
}

impl fmt::LowerHex for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "0x")?;
        }
        for byte in &self.hash {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({:#x})", self)
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl FromStr for HashValue {
    type Err = HashValueParseError;

    fn from_str(s: &str) -> Result<Self, HashValueParseError> {
        Self::from_hex_literal(s)
    }
}

impl Serialize for HashValue {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.hash)
        }
    }
}

impl<'de> Deserialize<'de> for HashValue {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let encoded = <String>::deserialize(deserializer)?;
            HashValue::from_hex_literal(&encoded).map_err(de::Error::custom)
        } else {
            let bytes = <serde_bytes::ByteBuf>::deserialize(deserializer)?;
            HashValue::from_slice(&bytes).map_err(de::Error::custom)
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HashValueParseError;

impl fmt::Display for HashValueParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unable to parse HashValue")
    }
}

impl std::error::Error for HashValueParseError {}

/// A hash function seeded for one specific signable type.
pub trait CryptoHasher: Default {
    /// The 32-byte prefix this hasher was initialized with:
    /// `SHA3-256("APTOS::<TypeName>")`.
    fn seed() -> &'static [u8; 32];

    fn update(&mut self, bytes: &[u8]);

    fn finish(self) -> HashValue;
}

/// A type with a canonical, domain-separated hash: its salted hasher applied
/// to its BCS bytes.
pub trait CryptoHash {
    type Hasher: CryptoHasher;

    fn hash(&self) -> HashValue;
}

/// Shared engine behind the per-type hashers.
#[derive(Clone)]
pub struct DefaultHasher {
    state: Sha3_256,
}

impl DefaultHasher {
    /// Computes the seed for a salt. Callers cache the result in a static;
    /// the prehash is paid once per type per process.
    pub fn prefixed_hash(salt: &[u8]) -> [u8; 32] {
        let mut salted = b"APTOS::".to_vec();
        salted.extend_from_slice(salt);
        *HashValue::sha3_256_of(&salted).as_ref()
    }

    pub fn new_with_seed(seed: &[u8; 32]) -> Self {
        let mut state = Sha3_256::new();
        state.update(seed);
        DefaultHasher { state }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.state.update(bytes);
    }

    pub fn finish(self) -> HashValue {
        HashValue::new(self.state.finalize().into())
    }
}

/// Defines the salted hasher for a signable type and wires up its
/// [`CryptoHash`] impl over BCS bytes.
#[macro_export]
macro_rules! define_crypto_hasher {
    ($type_name:ident, $hasher_name:ident) => {
        #[derive(Clone)]
        pub struct $hasher_name($crate::hash::DefaultHasher);

        impl $hasher_name {
            fn seed_lazy() -> &'static [u8; 32] {
                static SEED: $crate::_once_cell::sync::OnceCell<[u8; 32]> =
                    $crate::_once_cell::sync::OnceCell::new();
                SEED.get_or_init(|| {
                    $crate::hash::DefaultHasher::prefixed_hash(
                        stringify!($type_name).as_bytes(),
                    )
                })
            }
        }

        impl Default for $hasher_name {
            fn default() -> Self {
                $hasher_name($crate::hash::DefaultHasher::new_with_seed(
                    Self::seed_lazy(),
                ))
            }
        }

        impl $crate::hash::CryptoHasher for $hasher_name {
            fn seed() -> &'static [u8; 32] {
                Self::seed_lazy()
            }

            fn update(&mut self, bytes: &[u8]) {
                self.0.update(bytes);
            }

            fn finish(self) -> $crate::hash::HashValue {
                self.0.finish()
            }
        }

        impl $crate::hash::CryptoHash for $type_name {
            type Hasher = $hasher_name;

            fn hash(&self) -> $crate::hash::HashValue {
                use $crate::hash::CryptoHasher;
                let mut state = Self::Hasher::default();
                state.update(
                    &$crate::_aptos_bcs::to_bytes(self)
                        .expect("BCS serialization of a signable type cannot fail"),
                );
                state.finish()
            }
        }
    };
}

/// Unsalted hasher for tests: plain SHA3-256 over BCS bytes.
#[derive(Clone, Default)]
pub struct TestOnlyHasher {
    state: Option<DefaultHasher>,
}

static TEST_ONLY_SEED: Lazy<[u8; 32]> = Lazy::new(|| [0; 32]);

impl CryptoHasher for TestOnlyHasher {
    fn seed() -> &'static [u8; 32] {
        // Never mixed into the state; the test hasher is deliberately
        // unsalted so plain SHA3 vectors stay comparable.
        &TEST_ONLY_SEED
    }

    fn update(&mut self, bytes: &[u8]) {
        self.state
            .get_or_insert_with(|| DefaultHasher {
                state: Sha3_256::new(),
            })
            .update(bytes);
    }

    fn finish(self) -> HashValue {
        match self.state {
            Some(hasher) => hasher.finish(),
            None => HashValue::sha3_256_of(&[]),
        }
    }
}

/// Hash any serializable value with the unsalted test hasher.
pub trait TestOnlyHash {
    fn test_only_hash(&self) -> HashValue;
}

impl<T: Serialize + ?Sized> TestOnlyHash for T {
    fn test_only_hash(&self) -> HashValue {
        let bytes = aptos_bcs::to_bytes(self).expect("serialize should not fail in tests");
        let mut hasher = TestOnlyHasher::default();
        hasher.update(&bytes);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha3_vector() {
        assert_eq!(
            format!("{:x}", HashValue::sha3_256_of(b"hello")),
            "3338be694f50c5f338814986cdf0686453a888b84f424d792af4b9202398f392",
        );
    }

    #[test]
    fn test_only_hash_is_sha3_of_bcs() {
        assert_eq!(
            b"world".test_only_hash(),
            HashValue::from_iter_sha3(vec![aptos_bcs::to_bytes(b"world".as_slice())
                .unwrap()
                .as_slice()]),
        );
    }

    #[test]
    fn hex_roundtrip() {
        let hash = HashValue::sha3_256_of(b"roundtrip");
        assert_eq!(HashValue::from_hex(hash.to_hex()).unwrap(), hash);
        assert_eq!(
            HashValue::from_hex_literal(&hash.to_hex_literal()).unwrap(),
            hash
        );
        assert!(HashValue::from_hex("abcd").is_err());
    }

    #[test]
    fn bcs_form_is_length_prefixed() {
        let hash = HashValue::zero();
        let bytes = aptos_bcs::to_bytes(&hash).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 32);
        assert_eq!(aptos_bcs::from_bytes::<HashValue>(&bytes).unwrap(), hash);
    }
}
