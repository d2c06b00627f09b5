// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{
    ed25519::{
        ed25519_keys::{deserialize_material_bytes, Ed25519PrivateKey, Ed25519PublicKey},
        ED25519_SIGNATURE_LENGTH, L,
    },
    traits::{CryptoMaterialError, Signature, ValidCryptoMaterial},
};
use anyhow::{anyhow, Result};
use serde::{de, ser, Deserialize, Serialize};
use std::{cmp::Ordering, fmt, hash::Hash};

/// An Ed25519 signature.
#[derive(Clone)]
pub struct Ed25519Signature(pub(crate) ed25519_dalek::Signature);

impl Ed25519Signature {
    /// The length of the Ed25519Signature.
    pub const LENGTH: usize = ED25519_SIGNATURE_LENGTH;

    /// Serialize an Ed25519Signature.
    pub fn to_bytes(&self) -> [u8; ED25519_SIGNATURE_LENGTH] {
        self.0.to_bytes()
    }

    /// Deserialize an Ed25519Signature, without checking for malleability.
    pub(crate) fn from_bytes_unchecked(
        bytes: &[u8],
    ) -> Result<Ed25519Signature, CryptoMaterialError> {
        match ed25519_dalek::Signature::try_from(bytes) {
            Ok(sig) => Ok(Ed25519Signature(sig)),
            Err(_) => Err(CryptoMaterialError::DeserializationError),
        }
    }

    /// An all-zero signature of the correct width. The node accepts these on
    /// the simulation path, where signatures are deliberately invalid.
    pub fn dummy_signature() -> Self {
        Self::from_bytes_unchecked(&[0u8; Self::LENGTH]).expect("zero bytes are a valid encoding")
    }

    /// Checks that the scalar half of the signature is canonical, i.e.
    /// strictly less than the group order `l`.
    ///
    /// A non-canonical `S` admits a second, distinct encoding of the same
    /// signature; accepting it would let a third party mutate signed
    /// transactions in flight. Comparison is on the serialized form, most
    /// significant byte first.
    pub fn check_s_malleability(bytes: &[u8]) -> Result<(), CryptoMaterialError> {
        if bytes.len() != ED25519_SIGNATURE_LENGTH {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        for i in (32..ED25519_SIGNATURE_LENGTH).rev() {
            match bytes[i].cmp(&L[i - 32]) {
                Ordering::Less => return Ok(()),
                Ordering::Greater => {
                    return Err(CryptoMaterialError::CanonicalRepresentationError)
                },
                Ordering::Equal => {},
            }
        }
        // S == L is as non-canonical as S > L.
        Err(CryptoMaterialError::CanonicalRepresentationError)
    }
}

impl Signature for Ed25519Signature {
    type SigningKeyMaterial = Ed25519PrivateKey;
    type VerifyingKeyMaterial = Ed25519PublicKey;

    /// Checks malleability first, then verifies under the strict rules so
    /// that small-order components are rejected.
    fn verify_arbitrary_msg(&self, message: &[u8], public_key: &Ed25519PublicKey) -> Result<()> {
        Ed25519Signature::check_s_malleability(&self.to_bytes())?;
        public_key
            .0
            .verify_strict(message, &self.0)
            .map_err(|e| anyhow!("{}", e))
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }
}

impl TryFrom<&[u8]> for Ed25519Signature {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<Ed25519Signature, CryptoMaterialError> {
        Ed25519Signature::check_s_malleability(bytes)?;
        Ed25519Signature::from_bytes_unchecked(bytes)
    }
}

impl ValidCryptoMaterial for Ed25519Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }
}

impl PartialEq for Ed25519Signature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes()[..] == other.to_bytes()[..]
    }
}

impl Eq for Ed25519Signature {}

impl Hash for Ed25519Signature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(&self.to_bytes());
    }
}

impl fmt::Display for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({})", self)
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(self.to_bytes()))
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserialize_material_bytes(deserializer)?;
        Ed25519Signature::try_from(bytes.as_slice()).map_err(de::Error::custom)
    }
}
