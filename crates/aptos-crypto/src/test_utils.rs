// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Internal module containing convenience utility functions mainly for
//! testing.

use crate::traits::{PrivateKey, SigningKey, Uniform};
use serde::{Deserialize, Serialize};

/// A keypair consisting of a private and public key.
#[derive(Clone)]
pub struct KeyPair<S, P>
where
    S: SigningKey,
{
    pub private_key: S,
    pub public_key: P,
}

impl<S, P> KeyPair<S, P>
where
    S: SigningKey<PublicKeyMaterial = P>,
{
    pub fn generate<R>(rng: &mut R) -> Self
    where
        S: Uniform,
        R: rand::RngCore + rand::CryptoRng,
    {
        let private_key = S::generate(rng);
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }
}

impl<S, P> From<S> for KeyPair<S, P>
where
    S: SigningKey<PublicKeyMaterial = P>,
{
    fn from(private_key: S) -> Self {
        let public_key = private_key.public_key();
        KeyPair {
            private_key,
            public_key,
        }
    }
}

/// A serializable struct for tests that need a signable message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TestAptosCrypto(pub String);

crate::define_crypto_hasher!(TestAptosCrypto, TestAptosCryptoHasher);
