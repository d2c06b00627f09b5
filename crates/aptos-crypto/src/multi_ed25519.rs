// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! This module provides an API for the accountable threshold multi-sig
//! PureEdDSA scheme over the ed25519 curve: K-of-N over plain Ed25519 keys,
//! with a 4-byte bitmap recording which keys signed.
//!
//! The bitmap is indexed most significant bit first: bit 0 of byte 0 is key
//! index 0. Signatures are ordered by key index, never by arrival order.

use crate::{
    ed25519::{Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature},
    traits::{
        CryptoMaterialError, PrivateKey, PublicKey, Signature, SigningKey, ValidCryptoMaterial,
        VerifyingKey,
    },
};
use anyhow::{anyhow, Result};
use serde::{de, ser, Deserialize, Serialize};
use std::{fmt, hash::Hash};

/// Maximum number of keys in a MultiEd25519 aggregate.
pub const MAX_NUM_OF_KEYS: usize = 32;
/// Width of the signer bitmap.
pub const BITMAP_NUM_OF_BYTES: usize = 4;

// Every key index must be addressable by the fixed-width bitmap.
static_assertions::const_assert!(MAX_NUM_OF_KEYS <= BITMAP_NUM_OF_BYTES * 8);

/// Vector of private keys in the multi-key Ed25519 structure along with the
/// threshold, used to produce aggregate signatures in tests and tools.
#[derive(Clone, Eq, PartialEq)]
pub struct MultiEd25519PrivateKey {
    private_keys: Vec<Ed25519PrivateKey>,
    threshold: u8,
}

/// Vector of public keys in the multi-key Ed25519 structure along with the
/// threshold.
#[derive(Clone, Eq, PartialEq)]
pub struct MultiEd25519PublicKey {
    public_keys: Vec<Ed25519PublicKey>,
    threshold: u8,
}

/// Aggregate signature: up to `threshold` component signatures, ordered by
/// key index, plus the bitmap locating each one.
#[derive(Clone, Eq, PartialEq)]
pub struct MultiEd25519Signature {
    signatures: Vec<Ed25519Signature>,
    bitmap: [u8; BITMAP_NUM_OF_BYTES],
}

fn check_count(num_of_keys: usize, threshold: u8) -> Result<(), CryptoMaterialError> {
    if num_of_keys == 0 || threshold == 0 {
        Err(CryptoMaterialError::ValidationError)
    } else if num_of_keys > MAX_NUM_OF_KEYS || threshold as usize > num_of_keys {
        Err(CryptoMaterialError::ValidationError)
    } else {
        Ok(())
    }
}

impl MultiEd25519PrivateKey {
    pub fn new(
        private_keys: Vec<Ed25519PrivateKey>,
        threshold: u8,
    ) -> Result<Self, CryptoMaterialError> {
        check_count(private_keys.len(), threshold)?;
        Ok(MultiEd25519PrivateKey {
            private_keys,
            threshold,
        })
    }

    pub fn private_keys(&self) -> &Vec<Ed25519PrivateKey> {
        &self.private_keys
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

impl MultiEd25519PublicKey {
    pub fn new(
        public_keys: Vec<Ed25519PublicKey>,
        threshold: u8,
    ) -> Result<Self, CryptoMaterialError> {
        check_count(public_keys.len(), threshold)?;
        Ok(MultiEd25519PublicKey {
            public_keys,
            threshold,
        })
    }

    pub fn public_keys(&self) -> &Vec<Ed25519PublicKey> {
        &self.public_keys
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Concatenated key bytes followed by the one-byte threshold.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .public_keys
            .iter()
            .flat_map(|key| key.to_bytes())
            .collect();
        bytes.push(self.threshold);
        bytes
    }
}

impl MultiEd25519Signature {
    /// Builds from (signature, key index) pairs. Pairs may arrive in any
    /// order; they are stored sorted by index. A repeated or out-of-range
    /// index is an error.
    pub fn new(
        signatures: Vec<(Ed25519Signature, u8)>,
    ) -> Result<MultiEd25519Signature, CryptoMaterialError> {
        let num_of_sigs = signatures.len();
        if num_of_sigs == 0 || num_of_sigs > MAX_NUM_OF_KEYS {
            return Err(CryptoMaterialError::ValidationError);
        }
        let mut sorted_signatures = signatures;
        sorted_signatures.sort_by(|a, b| a.1.cmp(&b.1));
        let mut bitmap = [0u8; BITMAP_NUM_OF_BYTES];
        for (_, index) in &sorted_signatures {
            if *index as usize >= MAX_NUM_OF_KEYS {
                return Err(CryptoMaterialError::BitVecError(
                    "signature index is out of range".to_string(),
                ));
            }
            if bitmap_get_bit(&bitmap, *index as usize) {
                return Err(CryptoMaterialError::BitVecError(
                    "duplicate signature index".to_string(),
                ));
            }
            bitmap_set_bit(&mut bitmap, *index as usize);
        }
        Ok(MultiEd25519Signature {
            signatures: sorted_signatures.into_iter().map(|(sig, _)| sig).collect(),
            bitmap,
        })
    }

    pub fn signatures(&self) -> &Vec<Ed25519Signature> {
        &self.signatures
    }

    pub fn bitmap(&self) -> &[u8; BITMAP_NUM_OF_BYTES] {
        &self.bitmap
    }

    /// Concatenated signature bytes followed by the fixed 4-byte bitmap.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self
            .signatures
            .iter()
            .flat_map(|sig| sig.to_bytes())
            .collect();
        bytes.extend(&self.bitmap);
        bytes
    }
}

///////////////////////
// PrivateKey Traits //
///////////////////////

impl PrivateKey for MultiEd25519PrivateKey {
    type PublicKeyMaterial = MultiEd25519PublicKey;
}

impl SigningKey for MultiEd25519PrivateKey {
    type SignatureMaterial = MultiEd25519Signature;
    type VerifyingKeyMaterial = MultiEd25519PublicKey;

    /// Signs with the first `threshold` keys, which is the canonical
    /// aggregate a sole holder of all key material produces.
    fn sign_arbitrary_message(&self, message: &[u8]) -> MultiEd25519Signature {
        let mut bitmap = [0u8; BITMAP_NUM_OF_BYTES];
        let signatures: Vec<Ed25519Signature> = self
            .private_keys
            .iter()
            .take(self.threshold as usize)
            .enumerate()
            .map(|(i, key)| {
                bitmap_set_bit(&mut bitmap, i);
                key.sign_arbitrary_message(message)
            })
            .collect();
        MultiEd25519Signature { signatures, bitmap }
    }
}

impl From<&MultiEd25519PrivateKey> for MultiEd25519PublicKey {
    fn from(private_key: &MultiEd25519PrivateKey) -> Self {
        MultiEd25519PublicKey {
            public_keys: private_key
                .private_keys
                .iter()
                .map(|key| key.public_key())
                .collect(),
            threshold: private_key.threshold,
        }
    }
}

impl fmt::Debug for MultiEd25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiEd25519PrivateKey(<elided secret>)")
    }
}

//////////////////////
// PublicKey Traits //
//////////////////////

impl PublicKey for MultiEd25519PublicKey {
    type PrivateKeyMaterial = MultiEd25519PrivateKey;
}

impl VerifyingKey for MultiEd25519PublicKey {
    type SignatureMaterial = MultiEd25519Signature;
    type SigningKeyMaterial = MultiEd25519PrivateKey;
}

/// A 1-of-1 aggregate around a plain Ed25519 key, for the legacy encoding.
impl From<Ed25519PublicKey> for MultiEd25519PublicKey {
    fn from(public_key: Ed25519PublicKey) -> Self {
        MultiEd25519PublicKey {
            public_keys: vec![public_key],
            threshold: 1u8,
        }
    }
}

impl TryFrom<&[u8]> for MultiEd25519PublicKey {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<MultiEd25519PublicKey, CryptoMaterialError> {
        if bytes.is_empty() {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        let threshold = match bytes.last() {
            Some(threshold) => *threshold,
            None => return Err(CryptoMaterialError::WrongLengthError),
        };
        let key_bytes = &bytes[..bytes.len() - 1];
        if key_bytes.len() % Ed25519PublicKey::LENGTH != 0 {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        let num_of_keys = key_bytes.len() / Ed25519PublicKey::LENGTH;
        check_count(num_of_keys, threshold)?;
        let public_keys = key_bytes
            .chunks_exact(Ed25519PublicKey::LENGTH)
            .map(Ed25519PublicKey::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MultiEd25519PublicKey {
            public_keys,
            threshold,
        })
    }
}

impl ValidCryptoMaterial for MultiEd25519PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl Hash for MultiEd25519PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(&self.to_bytes());
    }
}

impl fmt::Display for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for MultiEd25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiEd25519PublicKey({})", self)
    }
}

//////////////////////
// Signature Traits //
//////////////////////

impl Signature for MultiEd25519Signature {
    type SigningKeyMaterial = MultiEd25519PrivateKey;
    type VerifyingKeyMaterial = MultiEd25519PublicKey;

    /// The aggregate verifies iff enough bits are set to meet the threshold,
    /// no bit points past the key list, and every flagged (index, signature)
    /// pair verifies individually.
    fn verify_arbitrary_msg(
        &self,
        message: &[u8],
        public_key: &MultiEd25519PublicKey,
    ) -> Result<()> {
        let signed = bitmap_count_ones(&self.bitmap);
        if signed != self.signatures.len() as u32 {
            return Err(anyhow!(
                "expected {} signatures per the bitmap, got {}",
                signed,
                self.signatures.len()
            ));
        }
        if signed < public_key.threshold as u32 {
            return Err(anyhow!(
                "not enough signatures: {} of required {}",
                signed,
                public_key.threshold
            ));
        }
        match bitmap_last_set_bit(&self.bitmap) {
            Some(last_bit) if last_bit as usize >= public_key.public_keys.len() => {
                return Err(anyhow!(
                    "bitmap points to key index {} but only {} keys exist",
                    last_bit,
                    public_key.public_keys.len()
                ));
            },
            None => return Err(anyhow!("empty bitmap")),
            _ => {},
        }

        let mut bitmap_index = 0usize;
        for signature in &self.signatures {
            while !bitmap_get_bit(&self.bitmap, bitmap_index) {
                bitmap_index += 1;
            }
            signature
                .verify_arbitrary_msg(message, &public_key.public_keys[bitmap_index])?;
            bitmap_index += 1;
        }
        Ok(())
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl From<Ed25519Signature> for MultiEd25519Signature {
    fn from(ed_signature: Ed25519Signature) -> Self {
        MultiEd25519Signature::new(vec![(ed_signature, 0u8)])
            .expect("a single signature at index 0 is always well-formed")
    }
}

impl TryFrom<&[u8]> for MultiEd25519Signature {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<MultiEd25519Signature, CryptoMaterialError> {
        let remainder = bytes
            .len()
            .checked_sub(BITMAP_NUM_OF_BYTES)
            .ok_or(CryptoMaterialError::WrongLengthError)?;
        if remainder % Ed25519Signature::LENGTH != 0 {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        let num_of_sigs = remainder / Ed25519Signature::LENGTH;
        if num_of_sigs == 0 || num_of_sigs > MAX_NUM_OF_KEYS {
            return Err(CryptoMaterialError::ValidationError);
        }
        let signatures = bytes[..remainder]
            .chunks_exact(Ed25519Signature::LENGTH)
            .map(Ed25519Signature::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let bitmap: [u8; BITMAP_NUM_OF_BYTES] = bytes[remainder..]
            .try_into()
            .map_err(|_| CryptoMaterialError::WrongLengthError)?;
        if bitmap_count_ones(&bitmap) != num_of_sigs as u32 {
            return Err(CryptoMaterialError::ValidationError);
        }
        Ok(MultiEd25519Signature { signatures, bitmap })
    }
}

impl ValidCryptoMaterial for MultiEd25519Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes()
    }
}

impl Hash for MultiEd25519Signature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(&self.to_bytes());
    }
}

impl fmt::Display for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for MultiEd25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MultiEd25519Signature({})", self)
    }
}

///////////
// Serde //
///////////

impl Serialize for MultiEd25519PublicKey {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(self.to_bytes()))
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for MultiEd25519PublicKey {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = crate::ed25519::ed25519_keys::deserialize_material_bytes(deserializer)?;
        MultiEd25519PublicKey::try_from(bytes.as_slice()).map_err(de::Error::custom)
    }
}

impl Serialize for MultiEd25519Signature {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(self.to_bytes()))
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for MultiEd25519Signature {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = crate::ed25519::ed25519_keys::deserialize_material_bytes(deserializer)?;
        MultiEd25519Signature::try_from(bytes.as_slice()).map_err(de::Error::custom)
    }
}

////////////
// Bitmap //
////////////

fn bitmap_set_bit(input: &mut [u8; BITMAP_NUM_OF_BYTES], index: usize) {
    let bucket = index / 8;
    // It's always invoked with index < 32, thus there is no need to check range.
    let bucket_pos = index - (bucket * 8);
    input[bucket] |= 0b1000_0000 >> bucket_pos as u8;
}

fn bitmap_get_bit(input: &[u8; BITMAP_NUM_OF_BYTES], index: usize) -> bool {
    let bucket = index / 8;
    let bucket_pos = index - (bucket * 8);
    (input[bucket] & (0b1000_0000 >> bucket_pos as u8)) != 0
}

fn bitmap_count_ones(input: &[u8; BITMAP_NUM_OF_BYTES]) -> u32 {
    input.iter().map(|byte| byte.count_ones()).sum()
}

/// Returns the index of the last set bit, if any.
fn bitmap_last_set_bit(input: &[u8; BITMAP_NUM_OF_BYTES]) -> Option<u8> {
    input
        .iter()
        .rev()
        .enumerate()
        .find(|(_, byte)| byte != &&0u8)
        .map(|(i, byte)| {
            (8 * (BITMAP_NUM_OF_BYTES - i) - byte.trailing_zeros() as usize - 1) as u8
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_helpers() {
        let mut bitmap = [0b0100_0000u8, 0b1111_1111, 0, 0b1000_0000];
        assert!(!bitmap_get_bit(&bitmap, 0));
        assert!(bitmap_get_bit(&bitmap, 1));
        for i in 8..16 {
            assert!(bitmap_get_bit(&bitmap, i));
        }
        assert!(!bitmap_get_bit(&bitmap, 23));
        assert!(bitmap_get_bit(&bitmap, 24));
        assert_eq!(bitmap_last_set_bit(&bitmap), Some(24));
        assert_eq!(bitmap_count_ones(&bitmap), 10);

        bitmap_set_bit(&mut bitmap, 30);
        assert!(bitmap_get_bit(&bitmap, 30));
        assert_eq!(bitmap_last_set_bit(&bitmap), Some(30));
    }
}
