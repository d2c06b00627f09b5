// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! This module provides an API for the ECDSA signature scheme over the
//! secp256k1 curve as defined in [SEC-2](https://www.secg.org/sec2-v2.pdf).
//!
//! Messages are hashed with SHA3-256 before signing. Signatures are the
//! 64-byte compact form, R then S, each half big-endian. Signing always
//! emits the low-S normalization and verification accepts only low-S, so a
//! signature has exactly one valid encoding.

use crate::{
    hash::HashValue,
    traits,
    traits::{CryptoMaterialError, Uniform, ValidCryptoMaterial},
};
use anyhow::{anyhow, Result};
use serde::{de, ser, Deserialize, Serialize};
use std::{fmt, hash::Hash};

/// The length in bytes of the Secp256k1Ecdsa PrivateKey.
pub const PRIVATE_KEY_LENGTH: usize = 32;
/// The length in bytes of the Secp256k1Ecdsa PublicKey: uncompressed SEC-1,
/// `0x04 || X || Y`.
pub const PUBLIC_KEY_LENGTH: usize = 65;
/// The length in bytes of the Secp256k1Ecdsa Signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// A secp256k1 ECDSA private key.
pub struct PrivateKey(pub(crate) libsecp256k1::SecretKey);

/// A secp256k1 ECDSA public key.
#[derive(Clone)]
pub struct PublicKey(pub(crate) libsecp256k1::PublicKey);

/// A secp256k1 ECDSA signature.
#[derive(Clone)]
pub struct Signature(pub(crate) libsecp256k1::Signature);

impl PrivateKey {
    /// The length of the PrivateKey.
    pub const LENGTH: usize = PRIVATE_KEY_LENGTH;

    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.0.serialize()
    }

    fn sign_digest(&self, digest: HashValue) -> Signature {
        let message = libsecp256k1::Message::parse(digest.as_ref());
        let (mut signature, _recovery_id) = libsecp256k1::sign(&message, &self.0);
        // Emit the canonical half of the (s, -s) pair.
        signature.normalize_s();
        Signature(signature)
    }
}

impl PublicKey {
    /// The length of the PublicKey.
    pub const LENGTH: usize = PUBLIC_KEY_LENGTH;

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.serialize()
    }
}

impl Signature {
    /// The length of the Signature.
    pub const LENGTH: usize = SIGNATURE_LENGTH;

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0.serialize()
    }

    /// An all-zero signature of the correct width, for simulation requests.
    pub fn dummy_signature() -> Self {
        Signature(libsecp256k1::Signature {
            r: libsecp256k1::curve::Scalar::from_int(0),
            s: libsecp256k1::curve::Scalar::from_int(0),
        })
    }

    fn check_malleability(&self) -> Result<(), CryptoMaterialError> {
        if self.0.s.is_high() {
            return Err(CryptoMaterialError::CanonicalRepresentationError);
        }
        Ok(())
    }
}

///////////////////////
// PrivateKey Traits //
///////////////////////

impl traits::PrivateKey for PrivateKey {
    type PublicKeyMaterial = PublicKey;
}

impl traits::SigningKey for PrivateKey {
    type SignatureMaterial = Signature;
    type VerifyingKeyMaterial = PublicKey;

    fn sign_arbitrary_message(&self, message: &[u8]) -> Signature {
        self.sign_digest(HashValue::sha3_256_of(message))
    }
}

impl Uniform for PrivateKey {
    fn generate<R>(rng: &mut R) -> Self
    where
        R: rand::RngCore + rand::CryptoRng,
    {
        // Rejection-sample until the bytes land in the scalar field; the
        // probability of even one retry is negligible.
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        loop {
            rng.fill_bytes(&mut bytes);
            if let Ok(secret_key) = libsecp256k1::SecretKey::parse(&bytes) {
                return PrivateKey(secret_key);
            }
        }
    }
}

impl TryFrom<&[u8]> for PrivateKey {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<PrivateKey, CryptoMaterialError> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        libsecp256k1::SecretKey::parse_slice(bytes)
            .map(PrivateKey)
            .map_err(|_| CryptoMaterialError::DeserializationError)
    }
}

impl ValidCryptoMaterial for PrivateKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        PrivateKey(self.0.clone())
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "secp256k1_ecdsa::PrivateKey(<elided secret>)")
    }
}

//////////////////////
// PublicKey Traits //
//////////////////////

impl From<&PrivateKey> for PublicKey {
    fn from(private_key: &PrivateKey) -> Self {
        PublicKey(libsecp256k1::PublicKey::from_secret_key(&private_key.0))
    }
}

impl traits::PublicKey for PublicKey {
    type PrivateKeyMaterial = PrivateKey;
}

impl traits::VerifyingKey for PublicKey {
    type SignatureMaterial = Signature;
    type SigningKeyMaterial = PrivateKey;
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<PublicKey, CryptoMaterialError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        libsecp256k1::PublicKey::parse_slice(
            bytes,
            Some(libsecp256k1::PublicKeyFormat::Full),
        )
        .map(PublicKey)
        .map_err(|_| CryptoMaterialError::DeserializationError)
    }
}

impl ValidCryptoMaterial for PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(&self.to_bytes());
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "secp256k1_ecdsa::PublicKey({})", self)
    }
}

//////////////////////
// Signature Traits //
//////////////////////

impl traits::Signature for Signature {
    type SigningKeyMaterial = PrivateKey;
    type VerifyingKeyMaterial = PublicKey;

    fn verify_arbitrary_msg(&self, message: &[u8], public_key: &PublicKey) -> Result<()> {
        self.check_malleability()?;
        let message =
            libsecp256k1::Message::parse(HashValue::sha3_256_of(message).as_ref());
        if libsecp256k1::verify(&message, &self.0, &public_key.0) {
            Ok(())
        } else {
            Err(anyhow!("unable to verify signature"))
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.0.serialize().to_vec()
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<Signature, CryptoMaterialError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(CryptoMaterialError::WrongLengthError);
        }
        let signature = libsecp256k1::Signature::parse_standard_slice(bytes)
            .map(Signature)
            .map_err(|_| CryptoMaterialError::DeserializationError)?;
        Ok(signature)
    }
}

impl ValidCryptoMaterial for Signature {
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
        write!(f, "secp256k1_ecdsa::Signature({})", self)
    }
}

///////////
// Serde //
///////////

macro_rules! material_serde {
    ($type:ty) => {
        impl Serialize for $type {
            fn serialize<S: ser::Serializer>(
                &self,
                serializer: S,
            ) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&hex::encode(self.to_bytes()))
                } else {
                    serializer.serialize_bytes(&self.to_bytes())
                }
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D: de::Deserializer<'de>>(
                deserializer: D,
            ) -> Result<Self, D::Error> {
                let bytes =
                    crate::ed25519::ed25519_keys::deserialize_material_bytes(deserializer)?;
                <$type>::try_from(bytes.as_slice()).map_err(de::Error::custom)
            }
        }
    };
}

material_serde!(PrivateKey);
material_serde!(PublicKey);
material_serde!(Signature);
