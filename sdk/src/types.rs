// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::transaction_builder::TransactionBuilder;
use anyhow::Result;
use aptos_crypto::{
    ed25519::{Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature},
    traits::{PrivateKey as _, Uniform},
};
use aptos_types::{
    account_address::AccountAddress,
    transaction::{
        authenticator::{AuthenticationKey, TransactionAuthenticator},
        RawTransaction, SignedTransaction,
    },
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Ed25519 key material plus its derived authentication key.
#[derive(Debug)]
pub struct AccountKey {
    private_key: Ed25519PrivateKey,
    public_key: Ed25519PublicKey,
    authentication_key: AuthenticationKey,
}

impl AccountKey {
    pub fn generate<R>(rng: &mut R) -> Self
    where
        R: rand::RngCore + rand::CryptoRng,
    {
        let private_key = Ed25519PrivateKey::generate(rng);
        Self::from_private_key(private_key)
    }

    pub fn from_private_key(private_key: Ed25519PrivateKey) -> Self {
        let public_key = private_key.public_key();
        let authentication_key = AuthenticationKey::ed25519(&public_key);
        Self {
            private_key,
            public_key,
            authentication_key,
        }
    }

    pub fn private_key(&self) -> &Ed25519PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    pub fn authentication_key(&self) -> AuthenticationKey {
        self.authentication_key
    }
}

impl From<Ed25519PrivateKey> for AccountKey {
    fn from(private_key: Ed25519PrivateKey) -> Self {
        Self::from_private_key(private_key)
    }
}

/// An account held in memory: address, signing key, and the process-wide
/// sequence-number allocator for that sender.
///
/// The sequence number is an atomic counter so that concurrent builders
/// (the transaction pipeline's, or several tasks sharing the account) each
/// draw a distinct, gap-free number. Reconciling with on-chain state after
/// a gap is an explicit [`LocalAccount::set_sequence_number`]; nothing
/// rewinds the counter implicitly.
#[derive(Debug)]
pub struct LocalAccount {
    address: AccountAddress,
    key: AccountKey,
    sequence_number: AtomicU64,
}

impl LocalAccount {
    pub fn new(address: AccountAddress, key: impl Into<AccountKey>, sequence_number: u64) -> Self {
        Self {
            address,
            key: key.into(),
            sequence_number: AtomicU64::new(sequence_number),
        }
    }

    /// Generate a new account with its address derived from the fresh key.
    pub fn generate<R>(rng: &mut R) -> Self
    where
        R: rand::RngCore + rand::CryptoRng,
    {
        let key = AccountKey::generate(rng);
        let address = key.authentication_key().account_address();
        Self::new(address, key, 0)
    }

    /// Recreate an account from a hex private key, e.g. out of a config
    /// file.
    pub fn from_private_key(private_key: &str, sequence_number: u64) -> Result<Self> {
        let bytes = hex::decode(private_key.strip_prefix("0x").unwrap_or(private_key))?;
        let key = AccountKey::from_private_key(Ed25519PrivateKey::try_from(bytes.as_slice())?);
        let address = key.authentication_key().account_address();
        Ok(Self::new(address, key, sequence_number))
    }

    pub fn address(&self) -> AccountAddress {
        self.address
    }

    pub fn private_key(&self) -> &Ed25519PrivateKey {
        self.key.private_key()
    }

    pub fn public_key(&self) -> &Ed25519PublicKey {
        self.key.public_key()
    }

    pub fn authentication_key(&self) -> AuthenticationKey {
        self.key.authentication_key()
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number.load(Ordering::SeqCst)
    }

    /// Allocates the next sequence number, returning the value to use now.
    pub fn increment_sequence_number(&self) -> u64 {
        self.sequence_number.fetch_add(1, Ordering::SeqCst)
    }

    /// Overwrites the allocator, e.g. after reading the on-chain value.
    pub fn set_sequence_number(&self, sequence_number: u64) {
        self.sequence_number.store(sequence_number, Ordering::SeqCst);
    }

    pub fn sign_transaction(&self, txn: RawTransaction) -> Result<SignedTransaction> {
        Ok(txn
            .sign(self.private_key(), self.public_key().clone())?
            .into_inner())
    }

    /// Finishes a builder with this account's identity and the next
    /// allocated sequence number, then signs.
    pub fn sign_with_transaction_builder(
        &self,
        builder: TransactionBuilder,
    ) -> Result<SignedTransaction> {
        let raw_txn = builder
            .sender(self.address())
            .sequence_number(self.increment_sequence_number())
            .build();
        self.sign_transaction(raw_txn)
    }

    /// Signs as the sender of a multi-agent transaction, with
    /// `secondary_signers` co-signing.
    pub fn sign_multi_agent_with_transaction_builder(
        &self,
        secondary_signers: Vec<&Self>,
        builder: TransactionBuilder,
    ) -> Result<SignedTransaction> {
        let raw_txn = builder
            .sender(self.address())
            .sequence_number(self.increment_sequence_number())
            .build();
        let secondary_signer_addresses = secondary_signers
            .iter()
            .map(|signer| signer.address())
            .collect();
        let secondary_private_keys = secondary_signers
            .iter()
            .map(|signer| signer.private_key())
            .collect();
        Ok(raw_txn
            .sign_multi_agent(
                self.private_key(),
                secondary_signer_addresses,
                secondary_private_keys,
            )?
            .into_inner())
    }

    /// Signs as the sender of a fee-payer transaction; gas is charged to
    /// `fee_payer` instead of this account.
    pub fn sign_fee_payer_with_transaction_builder(
        &self,
        secondary_signers: Vec<&Self>,
        fee_payer: &Self,
        builder: TransactionBuilder,
    ) -> Result<SignedTransaction> {
        let raw_txn = builder
            .sender(self.address())
            .sequence_number(self.increment_sequence_number())
            .build();
        let secondary_signer_addresses = secondary_signers
            .iter()
            .map(|signer| signer.address())
            .collect();
        let secondary_private_keys = secondary_signers
            .iter()
            .map(|signer| signer.private_key())
            .collect();
        Ok(raw_txn
            .sign_fee_payer(
                self.private_key(),
                secondary_signer_addresses,
                secondary_private_keys,
                fee_payer.address(),
                fee_payer.private_key(),
            )?
            .into_inner())
    }

    /// A signed transaction whose signature is the fixed-width all-zero
    /// bytes. The node rejects it for submission but accepts it for
    /// simulation, where an invalid signature is required.
    pub fn simulation_transaction(&self, raw_txn: RawTransaction) -> SignedTransaction {
        SignedTransaction::new_signed_transaction(
            raw_txn,
            TransactionAuthenticator::ed25519(
                self.public_key().clone(),
                Ed25519Signature::dummy_signature(),
            ),
        )
    }

    /// The hex private key, for persisting test accounts.
    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.private_key().to_bytes()))
    }
}
