// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Material types for the SLH-DSA-SHA2-128s stateless hash-based signature
//! scheme ([FIPS 205](https://csrc.nist.gov/pubs/fips/205/final)).
//!
//! Keys and signatures round-trip through their wire encodings so that
//! objects carrying them stay decodable, but sign and verify are not
//! implemented: no vetted implementation of the scheme is available in this
//! dependency set, and handing back a wrong answer would be worse than
//! refusing. Both operations return [`CryptoMaterialError::Unsupported`].

use crate::traits::CryptoMaterialError;
use serde::{de, ser, Deserialize, Serialize};
use std::{fmt, hash::Hash};

/// The length in bytes of the SLH-DSA-SHA2-128s public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// The length in bytes of the SLH-DSA-SHA2-128s private key.
pub const PRIVATE_KEY_LENGTH: usize = 64;
/// The length in bytes of an SLH-DSA-SHA2-128s signature.
pub const SIGNATURE_LENGTH: usize = 7856;

/// An SLH-DSA-SHA2-128s public key, carried as opaque bytes.
#[derive(Clone, Eq, PartialEq)]
pub struct PublicKey(Box<[u8; PUBLIC_KEY_LENGTH]>);

/// An SLH-DSA-SHA2-128s signature, carried as opaque bytes.
#[derive(Clone, Eq, PartialEq)]
pub struct Signature(Box<[u8; SIGNATURE_LENGTH]>);

impl PublicKey {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn verify(&self, _message: &[u8], _signature: &Signature) -> Result<(), CryptoMaterialError> {
        Err(CryptoMaterialError::Unsupported("slh-dsa-sha2-128s"))
    }
}

impl Signature {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// An all-zero signature of the correct width, for simulation requests.
    pub fn dummy_signature() -> Self {
        Signature(Box::new([0u8; SIGNATURE_LENGTH]))
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<PublicKey, CryptoMaterialError> {
        <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes)
            .map(|array| PublicKey(Box::new(array)))
            .map_err(|_| CryptoMaterialError::WrongLengthError)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = CryptoMaterialError;

    fn try_from(bytes: &[u8]) -> Result<Signature, CryptoMaterialError> {
        <[u8; SIGNATURE_LENGTH]>::try_from(bytes)
            .map(|array| Signature(Box::new(array)))
            .map_err(|_| CryptoMaterialError::WrongLengthError)
    }
}

impl Hash for PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(self.0.as_slice());
    }
}

impl Hash for Signature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write(self.0.as_slice());
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slh_dsa::PublicKey({})", hex::encode(self.0.as_slice()))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slh_dsa::Signature(<{} bytes>)", SIGNATURE_LENGTH)
    }
}

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

material_serde!(PublicKey);
material_serde!(Signature);
