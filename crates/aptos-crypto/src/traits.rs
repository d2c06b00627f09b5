// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Abstractions over the signature schemes the SDK supports. Every scheme
//! provides key material convertible to/from bytes, deterministic signing
//! over domain-separated messages, and offline verification.

use crate::hash::CryptoHash;
use serde::Serialize;
use std::{fmt::Debug, hash::Hash};
use thiserror::Error;

/// Reasons key or signature material fails to be ingested or used.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CryptoMaterialError {
    /// Bitmap construction or indexing failed for an aggregate signature.
    #[error("bitmap error: {0}")]
    BitVecError(String),
    /// Material could not be deserialized from its byte representation.
    #[error("deserialization error")]
    DeserializationError,
    /// Material could not be serialized.
    #[error("serialization error")]
    SerializationError,
    /// A structural constraint (e.g. a threshold bound) was violated.
    #[error("validation error")]
    ValidationError,
    /// Material had the wrong number of bytes.
    #[error("wrong length")]
    WrongLengthError,
    /// A scalar was not in canonical (reduced, low) form.
    #[error("non-canonical representation")]
    CanonicalRepresentationError,
    /// A curve point was of small order.
    #[error("small subgroup element")]
    SmallSubgroupError,
    /// A byte string did not decode to a point on the curve.
    #[error("point not on curve")]
    PointNotOnCurveError,
    /// The scheme is carried for wire compatibility but cannot sign or
    /// verify in this SDK.
    #[error("unsupported scheme: {0}")]
    Unsupported(&'static str),
}

/// Key and signature material with a canonical byte representation.
pub trait ValidCryptoMaterial:
    for<'a> TryFrom<&'a [u8], Error = CryptoMaterialError> + Serialize
{
    fn to_bytes(&self) -> Vec<u8>;
}

/// Material generatable from a cryptographically secure RNG.
pub trait Uniform: Sized {
    fn generate<R>(rng: &mut R) -> Self
    where
        R: rand::RngCore + rand::CryptoRng;
}

/// A private key with an associated public key type.
pub trait PrivateKey: Sized {
    type PublicKeyMaterial: PublicKey<PrivateKeyMaterial = Self> + for<'a> From<&'a Self>;

    fn public_key(&self) -> Self::PublicKeyMaterial {
        Self::PublicKeyMaterial::from(self)
    }
}

/// A public key, tied back to its private key type.
pub trait PublicKey: Sized + Clone + Debug + Eq + Hash {
    type PrivateKeyMaterial: PrivateKey<PublicKeyMaterial = Self>;
}

/// A private key that can produce signatures.
pub trait SigningKey: PrivateKey {
    type VerifyingKeyMaterial: VerifyingKey<SigningKeyMaterial = Self>;
    type SignatureMaterial: Signature<SigningKeyMaterial = Self>;

    /// Sign the canonical signing message of `message`: the type's salted
    /// hash prefix followed by its BCS bytes.
    fn sign<T: CryptoHash + Serialize>(
        &self,
        message: &T,
    ) -> Result<Self::SignatureMaterial, CryptoMaterialError> {
        Ok(self.sign_arbitrary_message(&signing_message(message)?))
    }

    /// Sign raw bytes. Outside tests, prefer [`SigningKey::sign`] so the
    /// domain separator is never skipped by accident.
    fn sign_arbitrary_message(&self, message: &[u8]) -> Self::SignatureMaterial;
}

/// A public key that can check signatures.
pub trait VerifyingKey: PublicKey {
    type SigningKeyMaterial: SigningKey<VerifyingKeyMaterial = Self>;
    type SignatureMaterial: Signature<VerifyingKeyMaterial = Self>;

    fn verify_struct_signature<T: CryptoHash + Serialize>(
        &self,
        message: &T,
        signature: &Self::SignatureMaterial,
    ) -> anyhow::Result<()> {
        signature.verify(message, self)
    }
}

/// A signature, verifiable against the matching public key type.
pub trait Signature: Sized + Clone + Debug + Eq + Hash {
    type VerifyingKeyMaterial: VerifyingKey<SignatureMaterial = Self>;
    type SigningKeyMaterial: SigningKey<SignatureMaterial = Self>;

    /// Verify against the canonical signing message of `message`.
    fn verify<T: CryptoHash + Serialize>(
        &self,
        message: &T,
        public_key: &Self::VerifyingKeyMaterial,
    ) -> anyhow::Result<()> {
        self.verify_arbitrary_msg(&signing_message(message)?, public_key)
    }

    /// Verify against raw bytes. The caller is responsible for domain
    /// separation.
    fn verify_arbitrary_msg(
        &self,
        message: &[u8],
        public_key: &Self::VerifyingKeyMaterial,
    ) -> anyhow::Result<()>;

    fn to_bytes(&self) -> Vec<u8>;
}

/// The byte string actually signed for `message`: the 32-byte salted hash
/// prefix of its type (domain separation) followed by its BCS encoding.
pub fn signing_message<T: CryptoHash + Serialize>(
    message: &T,
) -> Result<Vec<u8>, CryptoMaterialError> {
    let mut bytes = T::Hasher::seed().to_vec();
    let body =
        aptos_bcs::to_bytes(message).map_err(|_| CryptoMaterialError::SerializationError)?;
    bytes.extend(body);
    Ok(bytes)
}

pub use crate::hash::CryptoHasher;
