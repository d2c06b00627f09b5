// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{
    secp256r1_ecdsa::{PrivateKey, PublicKey, SIGNATURE_LENGTH},
    traits,
    traits::CryptoMaterialError,
};
use anyhow::{anyhow, Result};
use p256::ecdsa::signature::Verifier;
use serde::{de, ser, Deserialize, Serialize};
use std::{fmt, hash::Hash};

/// A NIST-P256 ECDSA signature in 64-byte compact form, R then S, big-endian
/// halves.
#[derive(Clone)]
pub struct Signature(pub(crate) p256::ecdsa::Signature);

impl Signature {
    /// The length of the Signature.
    pub const LENGTH: usize = SIGNATURE_LENGTH;

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes.copy_from_slice(&self.0.to_bytes());
        bytes
    }

    /// Rejects the high half of the (s, -s) pair; only one encoding of a
    /// signature may verify.
    fn check_malleability(&self) -> Result<(), CryptoMaterialError> {
        if self.0.normalize_s().is_some() {
            return Err(CryptoMaterialError::CanonicalRepresentationError);
        }
        Ok(())
    }
}

impl traits::Signature for Signature {
    type SigningKeyMaterial = PrivateKey;
    type VerifyingKeyMaterial = PublicKey;

    fn verify_arbitrary_msg(&self, message: &[u8], public_key: &PublicKey) -> Result<()> {
        self.check_malleability()?;
        public_key
            .0
            .verify(message, &self.0)
            .map_err(|e| anyhow!("{}", e))
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<Signature, CryptoMaterialError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        let signature = p256::ecdsa::Signature::from_slice(bytes)
            .map(Signature)
            .map_err(|_| CryptoMaterialError::DeserializationError)?;
        signature.check_malleability()?;
        Ok(signature)
    }
}

impl traits::ValidCryptoMaterial for Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(&self.to_bytes());
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "secp256r1_ecdsa::Signature({})", self)
    }
}

impl Serialize for Signature {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(self.to_bytes()))
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = crate::ed25519::ed25519_keys::deserialize_material_bytes(deserializer)?;
        Signature::try_from(bytes.as_slice()).map_err(de::Error::custom)
    }
}
