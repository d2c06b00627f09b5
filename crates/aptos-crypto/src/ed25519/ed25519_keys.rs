// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{
    ed25519::{Ed25519Signature, ED25519_PRIVATE_KEY_LENGTH, ED25519_PUBLIC_KEY_LENGTH},
    traits::{
        CryptoMaterialError, PrivateKey, PublicKey, SigningKey, Uniform, ValidCryptoMaterial,
        VerifyingKey,
    },
};
use serde::{de, ser, Deserialize, Serialize};
use std::{fmt, hash::Hash};

/// An Ed25519 private key.
pub struct Ed25519PrivateKey(pub(crate) ed25519_dalek::SecretKey);

/// An Ed25519 public key.
#[derive(Clone)]
pub struct Ed25519PublicKey(pub(crate) ed25519_dalek::PublicKey);

impl Ed25519PrivateKey {
    /// The length of the Ed25519PrivateKey.
    pub const LENGTH: usize = ED25519_PRIVATE_KEY_LENGTH;

    /// Serialize an Ed25519PrivateKey.
    pub fn to_bytes(&self) -> [u8; ED25519_PRIVATE_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Deserialize an Ed25519PrivateKey without any validation checks apart
    /// from expected key size.
    pub(crate) fn from_bytes_unchecked(
        bytes: &[u8],
    ) -> Result<Ed25519PrivateKey, CryptoMaterialError> {
        match ed25519_dalek::SecretKey::from_bytes(bytes) {
            Ok(secret) => Ok(Ed25519PrivateKey(secret)),
            Err(_) => Err(CryptoMaterialError::DeserializationError),
        }
    }

    fn sign_bytes(&self, message: &[u8]) -> Ed25519Signature {
        let secret_key: &ed25519_dalek::SecretKey = &self.0;
        let public_key: Ed25519PublicKey = self.into();
        let expanded_secret_key = ed25519_dalek::ExpandedSecretKey::from(secret_key);
        let sig = expanded_secret_key.sign(message, &public_key.0);
        Ed25519Signature(sig)
    }
}

impl Ed25519PublicKey {
    /// The length of the Ed25519PublicKey.
    pub const LENGTH: usize = ED25519_PUBLIC_KEY_LENGTH;

    /// Serialize an Ed25519PublicKey.
    pub fn to_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Deserialize an Ed25519PublicKey, checking that the point is on the
    /// curve and not of small order.
    pub(crate) fn from_bytes_checked(
        bytes: &[u8],
    ) -> Result<Ed25519PublicKey, CryptoMaterialError> {
        if bytes.len() != ED25519_PUBLIC_KEY_LENGTH {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        let compressed = curve25519_dalek::edwards::CompressedEdwardsY::from_slice(bytes);
        let point = compressed
            .decompress()
            .ok_or(CryptoMaterialError::PointNotOnCurveError)?;
        if point.is_small_order() {
            return Err(CryptoMaterialError::SmallSubgroupError);
        }
        ed25519_dalek::PublicKey::from_bytes(bytes)
            .map(Ed25519PublicKey)
            .map_err(|_| CryptoMaterialError::DeserializationError)
    }
}

///////////////////////
// PrivateKey Traits //
///////////////////////

impl PrivateKey for Ed25519PrivateKey {
    type PublicKeyMaterial = Ed25519PublicKey;
}

impl SigningKey for Ed25519PrivateKey {
    type SignatureMaterial = Ed25519Signature;
    type VerifyingKeyMaterial = Ed25519PublicKey;

    fn sign_arbitrary_message(&self, message: &[u8]) -> Ed25519Signature {
        self.sign_bytes(message)
    }
}

impl Uniform for Ed25519PrivateKey {
    fn generate<R>(rng: &mut R) -> Self
    where
        R: rand::RngCore + rand::CryptoRng,
    {
        Ed25519PrivateKey(ed25519_dalek::SecretKey::generate(rng))
    }
}

impl PartialEq<Self> for Ed25519PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Ed25519PrivateKey {}

impl TryFrom<&[u8]> for Ed25519PrivateKey {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<Ed25519PrivateKey, CryptoMaterialError> {
        Ed25519PrivateKey::from_bytes_unchecked(bytes)
    }
}

impl ValidCryptoMaterial for Ed25519PrivateKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

// ed25519_dalek's secret key is not Clone; round-tripping through bytes is
// the supported way to duplicate the material.
impl Clone for Ed25519PrivateKey {
    fn clone(&self) -> Self {
        let serialized: &[u8] = &(self.to_bytes());
        Ed25519PrivateKey::try_from(serialized).expect("serialized key material is valid")
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PrivateKey(<elided secret>)")
    }
}

//////////////////////
// PublicKey Traits //
//////////////////////

impl From<&Ed25519PrivateKey> for Ed25519PublicKey {
    fn from(private_key: &Ed25519PrivateKey) -> Self {
        let secret: &ed25519_dalek::SecretKey = &private_key.0;
        let public: ed25519_dalek::PublicKey = secret.into();
        Ed25519PublicKey(public)
    }
}

impl PublicKey for Ed25519PublicKey {
    type PrivateKeyMaterial = Ed25519PrivateKey;
}

impl VerifyingKey for Ed25519PublicKey {
    type SignatureMaterial = Ed25519Signature;
    type SigningKeyMaterial = Ed25519PrivateKey;
}

impl TryFrom<&[u8]> for Ed25519PublicKey {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<Ed25519PublicKey, CryptoMaterialError> {
        Ed25519PublicKey::from_bytes_checked(bytes)
    }
}

impl ValidCryptoMaterial for Ed25519PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl PartialEq for Ed25519PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for Ed25519PublicKey {}

impl Hash for Ed25519PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(&self.to_bytes());
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", self)
    }
}

///////////
// Serde //
///////////

impl Serialize for Ed25519PrivateKey {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(self.to_bytes()))
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Ed25519PrivateKey {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserialize_material_bytes(deserializer)?;
        Ed25519PrivateKey::try_from(bytes.as_slice()).map_err(de::Error::custom)
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(self.to_bytes()))
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = deserialize_material_bytes(deserializer)?;
        Ed25519PublicKey::try_from(bytes.as_slice()).map_err(de::Error::custom)
    }
}

/// Key/signature material reads as hex text in human-readable formats and as
/// a length-prefixed byte string in BCS.
pub(crate) fn deserialize_material_bytes<'de, D: de::Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<u8>, D::Error> {
    if deserializer.is_human_readable() {
        let encoded = <String>::deserialize(deserializer)?;
        hex::decode(encoded.strip_prefix("0x").unwrap_or(&encoded)).map_err(de::Error::custom)
    } else {
        let bytes = <serde_bytes::ByteBuf>::deserialize(deserializer)?;
        Ok(bytes.into_vec())
    }
}
