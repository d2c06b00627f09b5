// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Authenticators prove that the right parties approved a transaction. An
//! [`AccountAuthenticator`] carries one account's public key material and
//! signature (possibly aggregated); a [`TransactionAuthenticator`] arranges
//! account authenticators into the shape the transaction requires: single
//! sender, legacy multi-sig, multi-agent, or fee-payer.
//!
//! Every tag and byte layout in this file is consensus-visible.

use crate::{
    account_address::AccountAddress,
    transaction::{RawTransaction, RawTransactionWithData},
};
use anyhow::{bail, ensure, Result};
use aptos_crypto::{
    ed25519::{Ed25519PublicKey, Ed25519Signature},
    hash::{CryptoHash, HashValue},
    multi_ed25519::{MultiEd25519PublicKey, MultiEd25519Signature},
    secp256k1_ecdsa, secp256r1_ecdsa, slh_dsa,
    traits::{CryptoMaterialError, Signature as _},
};
use serde::{de, ser, Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Scheme byte mixed into the hash that derives an account's authentication
/// key, and (in the reserved range) into derived-address hashes. A scheme
/// byte may never be reused across schemes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Scheme {
    Ed25519 = 0,
    MultiEd25519 = 1,
    SingleKey = 2,
    MultiKey = 3,
    /// Reserved: auid (globally unique identifier) derivation.
    DeriveAuid = 251,
    /// Reserved: object address derived from another object.
    DeriveObjectAddressFromObject = 252,
    /// Reserved: object address derived from a GUID.
    DeriveObjectAddressFromGuid = 253,
    /// Reserved: named object address derived from a seed.
    DeriveObjectAddressFromSeed = 254,
    /// Reserved: resource account address.
    DeriveResourceAccountAddress = 255,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let display = match self {
            Scheme::Ed25519 => "Ed25519",
            Scheme::MultiEd25519 => "MultiEd25519",
            Scheme::SingleKey => "SingleKey",
            Scheme::MultiKey => "MultiKey",
            Scheme::DeriveAuid => "DeriveAuid",
            Scheme::DeriveObjectAddressFromObject => "DeriveObjectAddressFromObject",
            Scheme::DeriveObjectAddressFromGuid => "DeriveObjectAddressFromGuid",
            Scheme::DeriveObjectAddressFromSeed => "DeriveObjectAddressFromSeed",
            Scheme::DeriveResourceAccountAddress => "DeriveResourceAccountAddress",
        };
        write!(f, "Scheme::{}", display)
    }
}

/// The 32-byte value an account's address initially equals:
/// `SHA3-256(public key material || scheme byte)`. Key rotation can later
/// decouple the two; derivation itself never changes.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AuthenticationKey([u8; AuthenticationKey::LENGTH]);

impl AuthenticationKey {
    /// The number of bytes in an authentication key.
    pub const LENGTH: usize = 32;

    pub fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create an authentication key from a preimage by hashing it.
    pub fn from_preimage(mut public_key_bytes: Vec<u8>, scheme: Scheme) -> AuthenticationKey {
        public_key_bytes.push(scheme as u8);
        AuthenticationKey::new(*HashValue::sha3_256_of(&public_key_bytes).as_ref())
    }

    /// Create an authentication key from an Ed25519 public key.
    pub fn ed25519(public_key: &Ed25519PublicKey) -> AuthenticationKey {
        Self::from_preimage(public_key.to_bytes().to_vec(), Scheme::Ed25519)
    }

    /// Create an authentication key from a MultiEd25519 public key.
    pub fn multi_ed25519(public_key: &MultiEd25519PublicKey) -> AuthenticationKey {
        Self::from_preimage(public_key.to_bytes(), Scheme::MultiEd25519)
    }

    /// Create an authentication key from any single wrapped key. The
    /// preimage is the BCS of the [`AnyPublicKey`], variant tag included.
    pub fn any_key(public_key: AnyPublicKey) -> AuthenticationKey {
        Self::from_preimage(public_key.to_bytes(), Scheme::SingleKey)
    }

    /// Create an authentication key from a K-of-N key set.
    pub fn multi_key(public_keys: MultiKey) -> AuthenticationKey {
        Self::from_preimage(public_keys.to_bytes(), Scheme::MultiKey)
    }

    /// The address an account with this authentication key starts at.
    pub fn account_address(&self) -> AccountAddress {
        AccountAddress::new(self.0)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl AsRef<[u8]> for AuthenticationKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({})", self)
    }
}

impl FromStr for AuthenticationKey {
    type Err = CryptoMaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))
            .map_err(|_| CryptoMaterialError::DeserializationError)?;
        <[u8; Self::LENGTH]>::try_from(bytes.as_slice())
            .map(Self::new)
            .map_err(|_| CryptoMaterialError::WrongLengthError)
    }
}

impl Serialize for AuthenticationKey {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&hex::encode(self.0))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for AuthenticationKey {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = if deserializer.is_human_readable() {
            let encoded = <String>::deserialize(deserializer)?;
            hex::decode(encoded.strip_prefix("0x").unwrap_or(&encoded))
                .map_err(de::Error::custom)?
        } else {
            <serde_bytes::ByteBuf>::deserialize(deserializer)?.into_vec()
        };
        <[u8; Self::LENGTH]>::try_from(bytes.as_slice())
            .map(Self::new)
            .map_err(|_| de::Error::custom("expected 32 bytes"))
    }
}

/// Placeholder material for keyless accounts (OIDC-derived). The bytes
/// round-trip so transactions carrying them stay decodable; verification is
/// out of scope for this SDK.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct KeylessPublicKey(#[serde(with = "serde_bytes")] pub Vec<u8>);

/// Placeholder material for federated keyless accounts.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct FederatedKeylessPublicKey(#[serde(with = "serde_bytes")] pub Vec<u8>);

/// Placeholder for a keyless (ZK) signature.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct KeylessSignature(#[serde(with = "serde_bytes")] pub Vec<u8>);

/// Placeholder for a WebAuthn assertion signature (backed by a secp256r1
/// credential).
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct WebAuthnSignature(#[serde(with = "serde_bytes")] pub Vec<u8>);

/// Any single public key the chain can authenticate against, tagged for the
/// wire. Unknown tags fail decoding; there is no open fallback variant.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum AnyPublicKey {
    Ed25519 {
        public_key: Ed25519PublicKey,
    },
    Secp256k1Ecdsa {
        public_key: secp256k1_ecdsa::PublicKey,
    },
    Secp256r1Ecdsa {
        public_key: secp256r1_ecdsa::PublicKey,
    },
    Keyless {
        public_key: KeylessPublicKey,
    },
    FederatedKeyless {
        public_key: FederatedKeylessPublicKey,
    },
}

impl AnyPublicKey {
    pub fn ed25519(public_key: Ed25519PublicKey) -> Self {
        Self::Ed25519 { public_key }
    }

    pub fn secp256k1_ecdsa(public_key: secp256k1_ecdsa::PublicKey) -> Self {
        Self::Secp256k1Ecdsa { public_key }
    }

    pub fn secp256r1_ecdsa(public_key: secp256r1_ecdsa::PublicKey) -> Self {
        Self::Secp256r1Ecdsa { public_key }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        aptos_bcs::to_bytes(self).expect("Only unhandleable errors happen here.")
    }
}

/// Any single signature, tagged for the wire. Note the asymmetry with
/// [`AnyPublicKey`]: a secp256r1 credential signs through WebAuthn.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum AnySignature {
    Ed25519 {
        signature: Ed25519Signature,
    },
    Secp256k1Ecdsa {
        signature: secp256k1_ecdsa::Signature,
    },
    WebAuthn {
        signature: WebAuthnSignature,
    },
    Keyless {
        signature: KeylessSignature,
    },
}

impl AnySignature {
    pub fn ed25519(signature: Ed25519Signature) -> Self {
        Self::Ed25519 { signature }
    }

    pub fn secp256k1_ecdsa(signature: secp256k1_ecdsa::Signature) -> Self {
        Self::Secp256k1Ecdsa { signature }
    }

    /// Verifies this signature over `message`'s signing transcript against
    /// the paired public key. Placeholder schemes refuse rather than guess.
    pub fn verify<T: CryptoHash + Serialize>(
        &self,
        public_key: &AnyPublicKey,
        message: &T,
    ) -> Result<()> {
        match (self, public_key) {
            (Self::Ed25519 { signature }, AnyPublicKey::Ed25519 { public_key }) => {
                signature.verify(message, public_key)
            },
            (Self::Secp256k1Ecdsa { signature }, AnyPublicKey::Secp256k1Ecdsa { public_key }) => {
                signature.verify(message, public_key)
            },
            (Self::WebAuthn { .. }, _) => {
                bail!(CryptoMaterialError::Unsupported("webauthn"))
            },
            (Self::Keyless { .. }, _) => {
                bail!(CryptoMaterialError::Unsupported("keyless"))
            },
            _ => bail!("invalid key and signature combination"),
        }
    }
}

/// A single wrapped key and its signature, routed through the uniform
/// SingleSender transaction authenticator.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SingleKeyAuthenticator {
    public_key: AnyPublicKey,
    signature: AnySignature,
}

impl SingleKeyAuthenticator {
    pub fn new(public_key: AnyPublicKey, signature: AnySignature) -> Self {
        Self {
            public_key,
            signature,
        }
    }

    pub fn public_key(&self) -> &AnyPublicKey {
        &self.public_key
    }

    pub fn signature(&self) -> &AnySignature {
        &self.signature
    }

    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::any_key(self.public_key.clone())
    }

    pub fn verify<T: CryptoHash + Serialize>(&self, message: &T) -> Result<()> {
        self.signature.verify(&self.public_key, message)
    }
}

/// The maximum number of keys a MultiKey set may hold.
pub const MAX_NUM_OF_KEYS: usize = 32;

/// An ordered set of heterogeneous public keys and the number of signatures
/// required to authenticate.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct MultiKey {
    public_keys: Vec<AnyPublicKey>,
    signatures_required: u8,
}

impl MultiKey {
    pub fn new(
        public_keys: Vec<AnyPublicKey>,
        signatures_required: u8,
    ) -> Result<Self, CryptoMaterialError> {
        if signatures_required == 0
            || public_keys.len() < signatures_required as usize
            || public_keys.len() > MAX_NUM_OF_KEYS
        {
            return Err(CryptoMaterialError::ValidationError);
        }
        Ok(Self {
            public_keys,
            signatures_required,
        })
    }

    pub fn public_keys(&self) -> &[AnyPublicKey] {
        &self.public_keys
    }

    pub fn signatures_required(&self) -> u8 {
        self.signatures_required
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        aptos_bcs::to_bytes(self).expect("Only unhandleable errors happen here.")
    }

    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::multi_key(self.clone())
    }
}

/// A K-of-N aggregate: the signatures, ordered by key index, and a bitmap
/// (its own length-prefixed byte string on the wire, after the signatures)
/// whose bit `i`, most significant first, flags key `i` as having signed.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct MultiKeyAuthenticator {
    public_keys: MultiKey,
    signatures: Vec<AnySignature>,
    #[serde(with = "serde_bytes")]
    signatures_bitmap: Vec<u8>,
}

impl MultiKeyAuthenticator {
    /// Builds from (key index, signature) pairs in any order. Out-of-range
    /// and duplicate indices are rejected here, so a constructed
    /// authenticator always has a well-formed bitmap.
    pub fn new(
        public_keys: MultiKey,
        signatures: Vec<(u8, AnySignature)>,
    ) -> Result<Self, CryptoMaterialError> {
        let num_keys = public_keys.public_keys().len();
        let mut bitmap = vec![0u8; num_keys.div_ceil(8)];
        let mut sorted = signatures;
        sorted.sort_by_key(|(index, _)| *index);
        for (index, _) in &sorted {
            if *index as usize >= num_keys {
                return Err(CryptoMaterialError::BitVecError(format!(
                    "signature index {} is out of range for {} keys",
                    index, num_keys
                )));
            }
            if bitmap_get_bit(&bitmap, *index as usize) {
                return Err(CryptoMaterialError::BitVecError(format!(
                    "duplicate signature index {}",
                    index
                )));
            }
            bitmap_set_bit(&mut bitmap, *index as usize);
        }
        Ok(Self {
            public_keys,
            signatures: sorted.into_iter().map(|(_, signature)| signature).collect(),
            signatures_bitmap: bitmap,
        })
    }

    pub fn public_keys(&self) -> &MultiKey {
        &self.public_keys
    }

    pub fn signatures(&self) -> &[AnySignature] {
        &self.signatures
    }

    pub fn signatures_bitmap(&self) -> &[u8] {
        &self.signatures_bitmap
    }

    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::multi_key(self.public_keys.clone())
    }

    /// The aggregate verifies iff the bitmap population meets the
    /// threshold, matches the signature count, stays within the key set,
    /// and every flagged (index, signature) pair verifies.
    pub fn verify<T: CryptoHash + Serialize>(&self, message: &T) -> Result<()> {
        let signed: u32 = self
            .signatures_bitmap
            .iter()
            .map(|byte| byte.count_ones())
            .sum();
        ensure!(
            signed == self.signatures.len() as u32,
            "bitmap flags {} signers but {} signatures are attached",
            signed,
            self.signatures.len(),
        );
        ensure!(
            signed >= self.public_keys.signatures_required() as u32,
            "{} signatures do not meet the required threshold of {}",
            signed,
            self.public_keys.signatures_required(),
        );
        let num_keys = self.public_keys.public_keys().len();
        let mut indices = Vec::with_capacity(self.signatures.len());
        for index in 0..self.signatures_bitmap.len() * 8 {
            if bitmap_get_bit(&self.signatures_bitmap, index) {
                ensure!(
                    index < num_keys,
                    "bitmap flags key index {} but only {} keys exist",
                    index,
                    num_keys,
                );
                indices.push(index);
            }
        }
        for (signature, index) in self.signatures.iter().zip(indices) {
            signature.verify(&self.public_keys.public_keys()[index], message)?;
        }
        Ok(())
    }
}

fn bitmap_set_bit(bitmap: &mut [u8], index: usize) {
    bitmap[index / 8] |= 0b1000_0000 >> (index % 8);
}

fn bitmap_get_bit(bitmap: &[u8], index: usize) -> bool {
    (bitmap[index / 8] & (0b1000_0000 >> (index % 8))) != 0
}

/// One account's proof of approval, in any of the supported schemes.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum AccountAuthenticator {
    /// Ed25519 single signature
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
    /// Ed25519 K-of-N multisignature
    MultiEd25519 {
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    },
    /// Any single key wrapped behind a uniform tag
    SingleKey { authenticator: SingleKeyAuthenticator },
    /// K-of-N over heterogeneous wrapped keys
    MultiKey { authenticator: MultiKeyAuthenticator },
}

impl AccountAuthenticator {
    pub fn scheme(&self) -> Scheme {
        match self {
            Self::Ed25519 { .. } => Scheme::Ed25519,
            Self::MultiEd25519 { .. } => Scheme::MultiEd25519,
            Self::SingleKey { .. } => Scheme::SingleKey,
            Self::MultiKey { .. } => Scheme::MultiKey,
        }
    }

    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }

    pub fn multi_ed25519(
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> Self {
        Self::MultiEd25519 {
            public_key,
            signature,
        }
    }

    pub fn single_key(authenticator: SingleKeyAuthenticator) -> Self {
        Self::SingleKey { authenticator }
    }

    pub fn multi_key(authenticator: MultiKeyAuthenticator) -> Self {
        Self::MultiKey { authenticator }
    }

    /// Verifies the carried signature(s) over `message`'s signing
    /// transcript.
    pub fn verify<T: CryptoHash + Serialize>(&self, message: &T) -> Result<()> {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => signature.verify(message, public_key),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => signature.verify(message, public_key),
            Self::SingleKey { authenticator } => authenticator.verify(message),
            Self::MultiKey { authenticator } => authenticator.verify(message),
        }
    }

    /// The authentication key this authenticator's key material derives.
    pub fn authentication_key(&self) -> AuthenticationKey {
        match self {
            Self::Ed25519 { public_key, .. } => AuthenticationKey::ed25519(public_key),
            Self::MultiEd25519 { public_key, .. } => {
                AuthenticationKey::multi_ed25519(public_key)
            },
            Self::SingleKey { authenticator } => authenticator.authentication_key(),
            Self::MultiKey { authenticator } => authenticator.authentication_key(),
        }
    }
}

/// The proof-of-approval arrangement for a whole transaction.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TransactionAuthenticator {
    /// Single Ed25519 signature
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
    /// Ed25519 K-of-N multisignature
    MultiEd25519 {
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    },
    /// Multi-agent: a sender plus secondary signers, all signing the same
    /// wrapped message.
    MultiAgent {
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    },
    /// Multi-agent plus a distinct gas payer.
    FeePayer {
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    },
    /// A single sender in any single-key scheme.
    SingleSender { sender: AccountAuthenticator },
}

impl TransactionAuthenticator {
    pub fn ed25519(public_key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::Ed25519 {
            public_key,
            signature,
        }
    }

    pub fn multi_ed25519(
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> Self {
        Self::MultiEd25519 {
            public_key,
            signature,
        }
    }

    pub fn multi_agent(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    ) -> Self {
        Self::MultiAgent {
            sender,
            secondary_signer_addresses,
            secondary_signers,
        }
    }

    pub fn fee_payer(
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    ) -> Self {
        Self::FeePayer {
            sender,
            secondary_signer_addresses,
            secondary_signers,
            fee_payer_address,
            fee_payer_signer,
        }
    }

    pub fn single_sender(sender: AccountAuthenticator) -> Self {
        Self::SingleSender { sender }
    }

    /// Verifies every signature this authenticator carries against the raw
    /// transaction, reconstructing the wrapped signing message for
    /// multi-agent and fee-payer arrangements.
    pub fn verify(&self, raw_txn: &RawTransaction) -> Result<()> {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => signature.verify(raw_txn, public_key),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => signature.verify(raw_txn, public_key),
            Self::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                ensure!(
                    secondary_signer_addresses.len() == secondary_signers.len(),
                    "number of secondary signer addresses ({}) does not match number of \
                     secondary authenticators ({})",
                    secondary_signer_addresses.len(),
                    secondary_signers.len(),
                );
                let message = RawTransactionWithData::new_multi_agent(
                    raw_txn.clone(),
                    secondary_signer_addresses.clone(),
                );
                sender.verify(&message)?;
                for signer in secondary_signers {
                    signer.verify(&message)?;
                }
                Ok(())
            },
            Self::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                ensure!(
                    secondary_signer_addresses.len() == secondary_signers.len(),
                    "number of secondary signer addresses ({}) does not match number of \
                     secondary authenticators ({})",
                    secondary_signer_addresses.len(),
                    secondary_signers.len(),
                );
                let message = RawTransactionWithData::new_fee_payer(
                    raw_txn.clone(),
                    secondary_signer_addresses.clone(),
                    *fee_payer_address,
                );
                sender.verify(&message)?;
                for signer in secondary_signers {
                    signer.verify(&message)?;
                }
                fee_payer_signer.verify(&message)?;
                Ok(())
            },
            Self::SingleSender { sender } => sender.verify(raw_txn),
        }
    }

    pub fn sender(&self) -> AccountAuthenticator {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => AccountAuthenticator::ed25519(public_key.clone(), signature.clone()),
            Self::MultiEd25519 {
                public_key,
                signature,
            } => AccountAuthenticator::multi_ed25519(public_key.clone(), signature.clone()),
            Self::MultiAgent { sender, .. }
            | Self::FeePayer { sender, .. }
            | Self::SingleSender { sender } => sender.clone(),
        }
    }
}

/// SLH-DSA key material derives an authentication key like any other single
/// key would, but cannot yet appear in an [`AnyPublicKey`]: the chain has
/// not assigned it a wire tag.
pub fn slh_dsa_authentication_key(_public_key: &slh_dsa::PublicKey) -> Result<AuthenticationKey> {
    bail!(CryptoMaterialError::Unsupported("slh-dsa-sha2-128s"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptos_crypto::traits::{SigningKey, Uniform};
    use rand::{rngs::StdRng, SeedableRng};
    use std::str::FromStr;

    #[test]
    fn ed25519_authentication_key_reference_vector() {
        let private_key = aptos_crypto::ed25519::Ed25519PrivateKey::try_from(
            hex::decode("c5338cd251c22daa8c9c9cc94f498cc8a5c7e1d2e75287a5dda91096fe64efa5")
                .unwrap()
                .as_slice(),
        )
        .unwrap();
        let public_key = aptos_crypto::traits::PrivateKey::public_key(&private_key);
        let auth_key = AuthenticationKey::ed25519(&public_key);
        assert_eq!(
            auth_key.to_string(),
            "0x978c213990c4833df71548df7ce49d54c759d6b6d932de22b24d56060b7af2aa"
        );
        assert_eq!(
            auth_key.account_address().to_string(),
            "0x978c213990c4833df71548df7ce49d54c759d6b6d932de22b24d56060b7af2aa"
        );
    }

    #[test]
    fn secp256k1_single_key_authentication_key_reference_vector() {
        let private_key = secp256k1_ecdsa::PrivateKey::try_from(
            hex::decode("d107155adf816a0a94c6db3c9489c13ad8a1eda7ada2e558ba3bfa47c020347e")
                .unwrap()
                .as_slice(),
        )
        .unwrap();
        let public_key = aptos_crypto::traits::PrivateKey::public_key(&private_key);
        let auth_key = AuthenticationKey::any_key(AnyPublicKey::secp256k1_ecdsa(public_key));
        assert_eq!(
            auth_key.to_string(),
            "0x5792c985bc96f436270bd2a3c692210b09c7febb8889345ceefdbae4bacfe498"
        );
    }

    #[test]
    fn scheme_bytes_are_pinned() {
        assert_eq!(Scheme::Ed25519 as u8, 0x00);
        assert_eq!(Scheme::MultiEd25519 as u8, 0x01);
        assert_eq!(Scheme::SingleKey as u8, 0x02);
        assert_eq!(Scheme::MultiKey as u8, 0x03);
        assert_eq!(Scheme::DeriveObjectAddressFromObject as u8, 0xFC);
        assert_eq!(Scheme::DeriveObjectAddressFromSeed as u8, 0xFE);
        assert_eq!(Scheme::DeriveResourceAccountAddress as u8, 0xFF);
    }

    #[test]
    fn any_public_key_wire_tags() {
        let mut rng = StdRng::from_seed([1u8; 32]);
        let ed25519 = aptos_crypto::ed25519::Ed25519PrivateKey::generate(&mut rng);
        let bytes = AnyPublicKey::ed25519(aptos_crypto::traits::PrivateKey::public_key(
            &ed25519,
        ))
        .to_bytes();
        // ULEB variant tag 0, then a 32-byte key with its length prefix.
        assert_eq!(bytes[0], 0);
        assert_eq!(bytes[1], 32);
        assert_eq!(bytes.len(), 34);

        let k1 = secp256k1_ecdsa::PrivateKey::generate(&mut rng);
        let bytes =
            AnyPublicKey::secp256k1_ecdsa(aptos_crypto::traits::PrivateKey::public_key(&k1))
                .to_bytes();
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[1], 65);
        assert_eq!(bytes.len(), 67);
    }

    #[test]
    fn multi_key_threshold_validation() {
        let mut rng = StdRng::from_seed([2u8; 32]);
        let keys: Vec<AnyPublicKey> = (0..3)
            .map(|_| {
                AnyPublicKey::ed25519(aptos_crypto::traits::PrivateKey::public_key(
                    &aptos_crypto::ed25519::Ed25519PrivateKey::generate(&mut rng),
                ))
            })
            .collect();
        assert!(MultiKey::new(keys.clone(), 0).is_err());
        assert!(MultiKey::new(keys.clone(), 4).is_err());
        assert!(MultiKey::new(keys, 2).is_ok());
    }

    #[test]
    fn multi_key_aggregate_verification() {
        let mut rng = StdRng::from_seed([3u8; 32]);
        let private_keys: Vec<aptos_crypto::ed25519::Ed25519PrivateKey> = (0..3)
            .map(|_| aptos_crypto::ed25519::Ed25519PrivateKey::generate(&mut rng))
            .collect();
        let multi_key = MultiKey::new(
            private_keys
                .iter()
                .map(|key| {
                    AnyPublicKey::ed25519(aptos_crypto::traits::PrivateKey::public_key(key))
                })
                .collect(),
            2,
        )
        .unwrap();

        let message = crate::transaction::test_helpers::raw_transaction_fixture();

        let sign = |index: usize| {
            (
                index as u8,
                AnySignature::ed25519(private_keys[index].sign(&message).unwrap()),
            )
        };

        // Indices 0 and 2, submitted out of order.
        let authenticator =
            MultiKeyAuthenticator::new(multi_key.clone(), vec![sign(2), sign(0)]).unwrap();
        assert_eq!(authenticator.signatures_bitmap(), &[0b1010_0000]);
        authenticator.verify(&message).unwrap();

        // Below the threshold.
        let authenticator =
            MultiKeyAuthenticator::new(multi_key.clone(), vec![sign(1)]).unwrap();
        assert!(authenticator.verify(&message).is_err());

        // Duplicate index.
        assert!(MultiKeyAuthenticator::new(multi_key.clone(), vec![sign(1), sign(1)]).is_err());

        // Out-of-range index.
        assert!(MultiKeyAuthenticator::new(multi_key, vec![sign(0), (7, sign(0).1)]).is_err());
    }

    #[test]
    fn changing_the_bitmap_invalidates_the_aggregate() {
        let mut rng = StdRng::from_seed([4u8; 32]);
        let private_keys: Vec<aptos_crypto::ed25519::Ed25519PrivateKey> = (0..3)
            .map(|_| aptos_crypto::ed25519::Ed25519PrivateKey::generate(&mut rng))
            .collect();
        let multi_key = MultiKey::new(
            private_keys
                .iter()
                .map(|key| {
                    AnyPublicKey::ed25519(aptos_crypto::traits::PrivateKey::public_key(key))
                })
                .collect(),
            2,
        )
        .unwrap();
        let message = crate::transaction::test_helpers::raw_transaction_fixture();
        let authenticator = MultiKeyAuthenticator::new(
            multi_key,
            vec![
                (0, AnySignature::ed25519(private_keys[0].sign(&message).unwrap())),
                (1, AnySignature::ed25519(private_keys[1].sign(&message).unwrap())),
            ],
        )
        .unwrap();
        authenticator.verify(&message).unwrap();

        // Shift the bitmap through the wire representation.
        let mut bytes = aptos_bcs::to_bytes(&authenticator).unwrap();
        let last = bytes.len() - 1;
        assert_eq!(bytes[last], 0b1100_0000);
        bytes[last] = 0b0110_0000;
        let tampered: MultiKeyAuthenticator = aptos_bcs::from_bytes(&bytes).unwrap();
        assert!(tampered.verify(&message).is_err());
    }

    #[test]
    fn authenticator_wire_tags() {
        let mut rng = StdRng::from_seed([5u8; 32]);
        let private_key = aptos_crypto::ed25519::Ed25519PrivateKey::generate(&mut rng);
        let public_key = aptos_crypto::traits::PrivateKey::public_key(&private_key);
        let message = crate::transaction::test_helpers::raw_transaction_fixture();
        let signature = private_key.sign(&message).unwrap();

        let txn_auth = TransactionAuthenticator::ed25519(public_key.clone(), signature.clone());
        assert_eq!(aptos_bcs::to_bytes(&txn_auth).unwrap()[0], 0);

        let single_sender = TransactionAuthenticator::single_sender(
            AccountAuthenticator::single_key(SingleKeyAuthenticator::new(
                AnyPublicKey::ed25519(public_key.clone()),
                AnySignature::ed25519(signature.clone()),
            )),
        );
        let bytes = aptos_bcs::to_bytes(&single_sender).unwrap();
        // SingleSender tag, then the SingleKey account authenticator tag.
        assert_eq!(bytes[0], 4);
        assert_eq!(bytes[1], 2);
        assert_eq!(
            aptos_bcs::from_bytes::<TransactionAuthenticator>(&bytes).unwrap(),
            single_sender
        );

        let account_auth = AccountAuthenticator::ed25519(public_key, signature);
        assert_eq!(aptos_bcs::to_bytes(&account_auth).unwrap()[0], 0);
    }

    #[test]
    fn multi_agent_length_mismatch_is_fatal() {
        let mut rng = StdRng::from_seed([6u8; 32]);
        let private_key = aptos_crypto::ed25519::Ed25519PrivateKey::generate(&mut rng);
        let public_key = aptos_crypto::traits::PrivateKey::public_key(&private_key);
        let raw_txn = crate::transaction::test_helpers::raw_transaction_fixture();
        let message =
            RawTransactionWithData::new_multi_agent(raw_txn.clone(), vec![AccountAddress::TWO]);
        let sender = AccountAuthenticator::ed25519(
            public_key,
            private_key.sign(&message).unwrap(),
        );
        let authenticator = TransactionAuthenticator::multi_agent(
            sender,
            vec![AccountAddress::TWO],
            vec![], // one address, zero authenticators
        );
        assert!(authenticator.verify(&raw_txn).is_err());
    }

    #[test]
    fn authentication_key_parses_back() {
        let key = AuthenticationKey::from_str(
            "0x978c213990c4833df71548df7ce49d54c759d6b6d932de22b24d56060b7af2aa",
        )
        .unwrap();
        assert_eq!(
            key.to_string(),
            "0x978c213990c4833df71548df7ce49d54c759d6b6d932de22b24d56060b7af2aa"
        );
    }
}
