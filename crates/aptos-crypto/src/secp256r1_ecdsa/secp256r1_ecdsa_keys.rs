// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{
    secp256r1_ecdsa::{Signature, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH},
    traits,
    traits::{CryptoMaterialError, Uniform, ValidCryptoMaterial},
};
use p256::{ecdsa::signature::Signer, elliptic_curve::sec1::ToEncodedPoint};
use serde::{de, ser, Deserialize, Serialize};
use std::{fmt, hash::Hash};

/// A NIST-P256 ECDSA private key.
pub struct PrivateKey(pub(crate) p256::ecdsa::SigningKey);

/// A NIST-P256 ECDSA public key, serialized in uncompressed SEC-1 form.
#[derive(Clone)]
pub struct PublicKey(pub(crate) p256::ecdsa::VerifyingKey);

impl PrivateKey {
    /// The length of the PrivateKey.
    pub const LENGTH: usize = PRIVATE_KEY_LENGTH;

    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.0.to_bytes().into()
    }

    pub(crate) fn sign_bytes(&self, message: &[u8]) -> Signature {
        let signature: p256::ecdsa::Signature = self.0.sign(message);
        // The signer already emits low-S; normalize anyway so the invariant
        // does not depend on the backing crate's default.
        Signature(signature.normalize_s().unwrap_or(signature))
    }
}

impl PublicKey {
    /// The length of the PublicKey.
    pub const LENGTH: usize = PUBLIC_KEY_LENGTH;

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(self.0.to_encoded_point(false).as_bytes());
        bytes
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
        self.sign_bytes(message)
    }
}

impl Uniform for PrivateKey {
    fn generate<R>(rng: &mut R) -> Self
    where
        R: rand::RngCore + rand::CryptoRng,
    {
        let mut bytes = [0u8; PRIVATE_KEY_LENGTH];
        loop {
            rng.fill_bytes(&mut bytes);
            if let Ok(signing_key) = p256::ecdsa::SigningKey::from_bytes(&bytes.into()) {
                return PrivateKey(signing_key);
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
        p256::ecdsa::SigningKey::from_slice(bytes)
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
        write!(f, "secp256r1_ecdsa::PrivateKey(<elided secret>)")
    }
}

//////////////////////
// PublicKey Traits //
//////////////////////

impl From<&PrivateKey> for PublicKey {
    fn from(private_key: &PrivateKey) -> Self {
        PublicKey(*private_key.0.verifying_key())
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
        p256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
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
        write!(f, "secp256r1_ecdsa::PublicKey({})", self)
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
