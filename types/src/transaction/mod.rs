// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The transaction model: what a client signs (`RawTransaction`, possibly
//! wrapped with extra signer data), what it submits (`SignedTransaction`),
//! and the payload variants in between.

use crate::{account_address::AccountAddress, chain_id::ChainId};
use anyhow::{format_err, Result};
use aptos_crypto::{
    ed25519::{Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature},
    hash::{CryptoHash, HashValue},
    multi_ed25519::{MultiEd25519PrivateKey, MultiEd25519PublicKey, MultiEd25519Signature},
    secp256k1_ecdsa,
    traits::{signing_message, CryptoMaterialError, SigningKey},
};
use once_cell::sync::OnceCell;
use serde::{ser, Deserialize, Serialize};
use std::{
    fmt,
    ops::Deref,
};

pub mod authenticator;
mod multisig;
mod script;

use authenticator::{
    AccountAuthenticator, AnyPublicKey, AnySignature, SingleKeyAuthenticator,
    TransactionAuthenticator,
};
pub use multisig::{Multisig, MultisigTransactionPayload};
pub use script::{EntryFunction, Script};

/// How a transaction is protected from replay: the classic per-account
/// sequence number, or a nonce for orderless transactions. A nonce-based
/// transaction pins its sequence number field to `u64::MAX`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum ReplayProtector {
    Nonce(u64),
    SequenceNumber(u64),
}

impl fmt::Display for ReplayProtector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReplayProtector::Nonce(nonce) => write!(f, "Nonce({})", nonce),
            ReplayProtector::SequenceNumber(sequence_number) => {
                write!(f, "SequenceNumber({})", sequence_number)
            },
        }
    }
}

/// RawTransaction is the portion of a transaction that a client signs.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Sender's address.
    sender: AccountAddress,

    /// Sequence number of this transaction. This must match the sequence
    /// number stored in the sender's account at the time the transaction
    /// executes.
    sequence_number: u64,

    /// The transaction payload, e.g., a script to execute.
    payload: TransactionPayload,

    /// Maximal total gas to spend for this transaction.
    max_gas_amount: u64,

    /// Price to be paid per gas unit.
    gas_unit_price: u64,

    /// Expiration timestamp for this transaction, represented as seconds
    /// from the Unix Epoch. If the current blockchain timestamp is greater
    /// than or equal to this time, the transaction has expired and will be
    /// discarded.
    expiration_timestamp_secs: u64,

    /// Chain ID of the network this transaction is intended for.
    chain_id: ChainId,
}

impl RawTransaction {
    /// Create a new `RawTransaction` with a payload.
    pub fn new(
        sender: AccountAddress,
        sequence_number: u64,
        payload: TransactionPayload,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        RawTransaction {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        }
    }

    /// Create a new `RawTransaction` with an entry function.
    pub fn new_entry_function(
        sender: AccountAddress,
        sequence_number: u64,
        entry_function: EntryFunction,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self::new(
            sender,
            sequence_number,
            TransactionPayload::EntryFunction(entry_function),
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        )
    }

    /// Create a new `RawTransaction` with a script.
    pub fn new_script(
        sender: AccountAddress,
        sequence_number: u64,
        script: Script,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self::new(
            sender,
            sequence_number,
            TransactionPayload::Script(script),
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        )
    }

    /// Create a new `RawTransaction` of multisig type.
    pub fn new_multisig(
        sender: AccountAddress,
        sequence_number: u64,
        multisig: Multisig,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        Self::new(
            sender,
            sequence_number,
            TransactionPayload::Multisig(multisig),
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        )
    }

    /// Create a `RawTransaction` in the versioned payload format, choosing
    /// the replay protection mode explicitly. Nonce-based transactions set
    /// the legacy sequence number field to `u64::MAX`.
    pub fn new_txn(
        sender: AccountAddress,
        replay_protector: ReplayProtector,
        executable: TransactionExecutable,
        multisig_address: Option<AccountAddress>,
        max_gas_amount: u64,
        gas_unit_price: u64,
        expiration_timestamp_secs: u64,
        chain_id: ChainId,
    ) -> Self {
        let (sequence_number, nonce) = match replay_protector {
            ReplayProtector::SequenceNumber(sequence_number) => (sequence_number, None),
            ReplayProtector::Nonce(nonce) => (u64::MAX, Some(nonce)),
        };
        Self::new(
            sender,
            sequence_number,
            TransactionPayload::Payload(TransactionPayloadInner::V1 {
                executable,
                extra_config: TransactionExtraConfig::V1 {
                    multisig_address,
                    replay_protection_nonce: nonce,
                },
            }),
            max_gas_amount,
            gas_unit_price,
            expiration_timestamp_secs,
            chain_id,
        )
    }

    /// Signs the given `RawTransaction`. Note that this consumes the
    /// `RawTransaction` and turns it into a `SignatureCheckedTransaction`.
    pub fn sign(
        self,
        private_key: &Ed25519PrivateKey,
        public_key: Ed25519PublicKey,
    ) -> Result<SignatureCheckedTransaction> {
        let signature = private_key.sign(&self)?;
        Ok(SignatureCheckedTransaction(SignedTransaction::new(
            self, public_key, signature,
        )))
    }

    /// Signs the given `RawTransaction` with a secp256k1 key, producing a
    /// SingleSender authenticator.
    pub fn sign_secp256k1_ecdsa(
        self,
        private_key: &secp256k1_ecdsa::PrivateKey,
        public_key: secp256k1_ecdsa::PublicKey,
    ) -> Result<SignatureCheckedTransaction> {
        let signature = private_key.sign(&self)?;
        Ok(SignatureCheckedTransaction(
            SignedTransaction::new_secp256k1_ecdsa(self, public_key, signature),
        ))
    }

    /// Signs the given `RawTransaction` with the legacy MultiEd25519
    /// aggregate.
    pub fn multi_sign(
        self,
        private_key: &MultiEd25519PrivateKey,
        public_key: MultiEd25519PublicKey,
    ) -> Result<SignatureCheckedTransaction> {
        let signature = private_key.sign(&self)?;
        Ok(SignatureCheckedTransaction(SignedTransaction::new_multisig(
            self, public_key, signature,
        )))
    }

    /// Signs the given multi-agent `RawTransaction`: the sender and every
    /// secondary signer sign the same wrapped message. The order and length
    /// of the secondary keys have to match the order and length of the
    /// secondary signer addresses.
    pub fn sign_multi_agent(
        self,
        sender_private_key: &Ed25519PrivateKey,
        secondary_signers: Vec<AccountAddress>,
        secondary_private_keys: Vec<&Ed25519PrivateKey>,
    ) -> Result<SignatureCheckedTransaction> {
        let message =
            RawTransactionWithData::new_multi_agent(self.clone(), secondary_signers.clone());
        let sender_authenticator =
            ed25519_authenticator(sender_private_key, &message)?;

        if secondary_private_keys.len() != secondary_signers.len() {
            return Err(format_err!(
                "number of secondary private keys and number of secondary signers don't match"
            ));
        }
        let mut secondary_authenticators = vec![];
        for private_key in secondary_private_keys {
            secondary_authenticators.push(ed25519_authenticator(private_key, &message)?);
        }

        Ok(SignatureCheckedTransaction(
            SignedTransaction::new_multi_agent(
                self,
                sender_authenticator,
                secondary_signers,
                secondary_authenticators,
            ),
        ))
    }

    /// Signs the given fee-payer `RawTransaction`: like multi-agent, plus a
    /// distinct gas payer signing the same wrapped message.
    pub fn sign_fee_payer(
        self,
        sender_private_key: &Ed25519PrivateKey,
        secondary_signers: Vec<AccountAddress>,
        secondary_private_keys: Vec<&Ed25519PrivateKey>,
        fee_payer_address: AccountAddress,
        fee_payer_private_key: &Ed25519PrivateKey,
    ) -> Result<SignatureCheckedTransaction> {
        let message = RawTransactionWithData::new_fee_payer(
            self.clone(),
            secondary_signers.clone(),
            fee_payer_address,
        );
        let sender_authenticator = ed25519_authenticator(sender_private_key, &message)?;

        if secondary_private_keys.len() != secondary_signers.len() {
            return Err(format_err!(
                "number of secondary private keys and number of secondary signers don't match"
            ));
        }
        let mut secondary_authenticators = vec![];
        for private_key in secondary_private_keys {
            secondary_authenticators.push(ed25519_authenticator(private_key, &message)?);
        }
        let fee_payer_authenticator = ed25519_authenticator(fee_payer_private_key, &message)?;

        Ok(SignatureCheckedTransaction(
            SignedTransaction::new_fee_payer(
                self,
                sender_authenticator,
                secondary_signers,
                secondary_authenticators,
                fee_payer_address,
                fee_payer_authenticator,
            ),
        ))
    }

    /// Return the sender of this transaction.
    pub fn sender(&self) -> AccountAddress {
        self.sender
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &TransactionPayload {
        &self.payload
    }

    pub fn into_payload(self) -> TransactionPayload {
        self.payload
    }

    pub fn max_gas_amount(&self) -> u64 {
        self.max_gas_amount
    }

    pub fn gas_unit_price(&self) -> u64 {
        self.gas_unit_price
    }

    pub fn expiration_timestamp_secs(&self) -> u64 {
        self.expiration_timestamp_secs
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn replay_protector(&self) -> ReplayProtector {
        if let Some(nonce) = self.payload.replay_protection_nonce() {
            ReplayProtector::Nonce(nonce)
        } else {
            ReplayProtector::SequenceNumber(self.sequence_number)
        }
    }

    /// Return the signing message for creating transaction signature: the
    /// salted hash prefix of this type, then the BCS bytes.
    pub fn signing_message(&self) -> Result<Vec<u8>, CryptoMaterialError> {
        signing_message(self)
    }
}

fn ed25519_authenticator(
    private_key: &Ed25519PrivateKey,
    message: &RawTransactionWithData,
) -> Result<AccountAuthenticator> {
    let signature = private_key.sign(message)?;
    Ok(AccountAuthenticator::ed25519(
        aptos_crypto::traits::PrivateKey::public_key(private_key),
        signature,
    ))
}

/// The message multi-agent and fee-payer participants actually sign: the raw
/// transaction wrapped together with who else is signing. Using a distinct
/// signable type (and therefore a distinct hash salt) keeps a plain
/// signature from ever being replayed as a multi-agent approval.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum RawTransactionWithData {
    MultiAgent {
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
    },
    MultiAgentWithFeePayer {
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: AccountAddress,
    },
}

impl RawTransactionWithData {
    pub fn new_multi_agent(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
    ) -> Self {
        Self::MultiAgent {
            raw_txn,
            secondary_signer_addresses,
        }
    }

    pub fn new_fee_payer(
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: AccountAddress,
    ) -> Self {
        Self::MultiAgentWithFeePayer {
            raw_txn,
            secondary_signer_addresses,
            fee_payer_address,
        }
    }
}

/// The deprecated module-bundle payload. Old transactions must stay
/// decodable, but this SDK refuses to produce a new one.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize)]
pub struct DeprecatedModuleBundle {
    modules: Vec<Module>,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(with = "serde_bytes")]
    code: Vec<u8>,
}

impl ser::Serialize for DeprecatedModuleBundle {
    fn serialize<S: ser::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(ser::Error::custom(
            "module bundle payloads are deprecated and cannot be encoded",
        ))
    }
}

/// Different kinds of transaction payloads.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TransactionPayload {
    /// A transaction that executes code.
    Script(Script),
    /// Deprecated.
    ModuleBundle(DeprecatedModuleBundle),
    /// A transaction that executes an existing entry function published
    /// on-chain.
    EntryFunction(EntryFunction),
    /// A multisig transaction that allows an owner of a multisig account to
    /// execute a pre-approved transaction as the multisig account.
    Multisig(Multisig),
    /// The versioned payload format carrying an executable plus extra
    /// configuration (multisig routing, replay protection nonce).
    Payload(TransactionPayloadInner),
}

impl TransactionPayload {
    pub fn is_multisig(&self) -> bool {
        match self {
            TransactionPayload::Multisig(_) => true,
            TransactionPayload::Payload(TransactionPayloadInner::V1 {
                extra_config, ..
            }) => extra_config.is_multisig(),
            _ => false,
        }
    }

    pub fn replay_protection_nonce(&self) -> Option<u64> {
        match self {
            TransactionPayload::Payload(TransactionPayloadInner::V1 {
                extra_config, ..
            }) => extra_config.replay_protection_nonce(),
            _ => None,
        }
    }

    pub fn executable_ref(&self) -> Result<TransactionExecutableRef> {
        match self {
            TransactionPayload::Script(script) => Ok(TransactionExecutableRef::Script(script)),
            TransactionPayload::EntryFunction(entry_function) => {
                Ok(TransactionExecutableRef::EntryFunction(entry_function))
            },
            TransactionPayload::Multisig(multisig) => match &multisig.transaction_payload {
                Some(MultisigTransactionPayload::EntryFunction(entry_function)) => {
                    Ok(TransactionExecutableRef::EntryFunction(entry_function))
                },
                None => Ok(TransactionExecutableRef::Empty),
            },
            TransactionPayload::Payload(TransactionPayloadInner::V1 { executable, .. }) => {
                Ok(executable.as_ref())
            },
            TransactionPayload::ModuleBundle(_) => {
                Err(format_err!("deprecated module bundle payload"))
            },
        }
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TransactionPayloadInner {
    V1 {
        executable: TransactionExecutable,
        extra_config: TransactionExtraConfig,
    },
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TransactionExecutable {
    Script(Script),
    EntryFunction(EntryFunction),
    Empty,
}

impl TransactionExecutable {
    pub fn as_ref(&self) -> TransactionExecutableRef {
        match self {
            TransactionExecutable::Script(script) => TransactionExecutableRef::Script(script),
            TransactionExecutable::EntryFunction(entry_function) => {
                TransactionExecutableRef::EntryFunction(entry_function)
            },
            TransactionExecutable::Empty => TransactionExecutableRef::Empty,
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum TransactionExecutableRef<'a> {
    Script(&'a Script),
    EntryFunction(&'a EntryFunction),
    Empty,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TransactionExtraConfig {
    V1 {
        multisig_address: Option<AccountAddress>,
        // None for regular transactions, Some(nonce) for orderless ones.
        replay_protection_nonce: Option<u64>,
    },
}

impl TransactionExtraConfig {
    pub fn is_multisig(&self) -> bool {
        match self {
            Self::V1 {
                multisig_address, ..
            } => multisig_address.is_some(),
        }
    }

    pub fn replay_protection_nonce(&self) -> Option<u64> {
        match self {
            Self::V1 {
                replay_protection_nonce,
                ..
            } => *replay_protection_nonce,
        }
    }
}

/// A transaction that has been signed.
#[derive(Clone, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The raw transaction
    raw_txn: RawTransaction,

    /// Public key and signature to authenticate
    authenticator: TransactionAuthenticator,

    /// A cached size of the raw transaction bytes. Prevents serializing the
    /// same transaction multiple times to determine size.
    #[serde(skip)]
    raw_txn_size: OnceCell<usize>,

    /// A cached size of the authenticator.
    #[serde(skip)]
    authenticator_size: OnceCell<usize>,

    /// A cached hash of the transaction.
    #[serde(skip)]
    committed_hash: OnceCell<HashValue>,
}

/// PartialEq ignores the cached OnceCell fields that may or may not be
/// initialized.
impl PartialEq for SignedTransaction {
    fn eq(&self, other: &Self) -> bool {
        self.raw_txn == other.raw_txn && self.authenticator == other.authenticator
    }
}

impl fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SignedTransaction")
            .field("raw_txn", &self.raw_txn)
            .field("authenticator", &self.authenticator)
            .finish()
    }
}

impl SignedTransaction {
    pub fn new_signed_transaction(
        raw_txn: RawTransaction,
        authenticator: TransactionAuthenticator,
    ) -> SignedTransaction {
        SignedTransaction {
            raw_txn,
            authenticator,
            raw_txn_size: OnceCell::new(),
            authenticator_size: OnceCell::new(),
            committed_hash: OnceCell::new(),
        }
    }

    pub fn new(
        raw_txn: RawTransaction,
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    ) -> SignedTransaction {
        Self::new_signed_transaction(
            raw_txn,
            TransactionAuthenticator::ed25519(public_key, signature),
        )
    }

    pub fn new_multisig(
        raw_txn: RawTransaction,
        public_key: MultiEd25519PublicKey,
        signature: MultiEd25519Signature,
    ) -> SignedTransaction {
        Self::new_signed_transaction(
            raw_txn,
            TransactionAuthenticator::multi_ed25519(public_key, signature),
        )
    }

    pub fn new_multi_agent(
        raw_txn: RawTransaction,
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    ) -> Self {
        Self::new_signed_transaction(
            raw_txn,
            TransactionAuthenticator::multi_agent(
                sender,
                secondary_signer_addresses,
                secondary_signers,
            ),
        )
    }

    pub fn new_fee_payer(
        raw_txn: RawTransaction,
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    ) -> Self {
        Self::new_signed_transaction(
            raw_txn,
            TransactionAuthenticator::fee_payer(
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            ),
        )
    }

    pub fn new_secp256k1_ecdsa(
        raw_txn: RawTransaction,
        public_key: secp256k1_ecdsa::PublicKey,
        signature: secp256k1_ecdsa::Signature,
    ) -> SignedTransaction {
        let authenticator = AccountAuthenticator::single_key(SingleKeyAuthenticator::new(
            AnyPublicKey::secp256k1_ecdsa(public_key),
            AnySignature::secp256k1_ecdsa(signature),
        ));
        Self::new_single_sender(raw_txn, authenticator)
    }

    pub fn new_single_sender(
        raw_txn: RawTransaction,
        authenticator: AccountAuthenticator,
    ) -> SignedTransaction {
        Self::new_signed_transaction(
            raw_txn,
            TransactionAuthenticator::single_sender(authenticator),
        )
    }

    pub fn authenticator(&self) -> TransactionAuthenticator {
        self.authenticator.clone()
    }

    pub fn authenticator_ref(&self) -> &TransactionAuthenticator {
        &self.authenticator
    }

    pub fn sender(&self) -> AccountAddress {
        self.raw_txn.sender
    }

    pub fn raw_transaction_ref(&self) -> &RawTransaction {
        &self.raw_txn
    }

    pub fn into_raw_transaction(self) -> RawTransaction {
        self.raw_txn
    }

    pub fn sequence_number(&self) -> u64 {
        self.raw_txn.sequence_number
    }

    pub fn replay_protector(&self) -> ReplayProtector {
        self.raw_txn.replay_protector()
    }

    pub fn chain_id(&self) -> ChainId {
        self.raw_txn.chain_id
    }

    pub fn payload(&self) -> &TransactionPayload {
        &self.raw_txn.payload
    }

    pub fn max_gas_amount(&self) -> u64 {
        self.raw_txn.max_gas_amount
    }

    pub fn gas_unit_price(&self) -> u64 {
        self.raw_txn.gas_unit_price
    }

    pub fn expiration_timestamp_secs(&self) -> u64 {
        self.raw_txn.expiration_timestamp_secs
    }

    pub fn raw_txn_bytes_len(&self) -> usize {
        *self.raw_txn_size.get_or_init(|| {
            aptos_bcs::serialized_size(&self.raw_txn)
                .expect("a constructed raw transaction is serializable")
        })
    }

    pub fn txn_bytes_len(&self) -> usize {
        let authenticator_size = *self.authenticator_size.get_or_init(|| {
            aptos_bcs::serialized_size(&self.authenticator)
                .expect("a constructed authenticator is serializable")
        });
        self.raw_txn_bytes_len() + authenticator_size
    }

    /// The chain's canonical hash of this transaction: the user-transaction
    /// variant of the ledger `Transaction` enum, hashed under its salted
    /// hasher. This is the hash the REST API reports and polling queries by.
    pub fn committed_hash(&self) -> HashValue {
        *self
            .committed_hash
            .get_or_init(|| Transaction::UserTransaction(self.clone()).hash())
    }

    /// Checks the signature (possibly aggregated) against the raw
    /// transaction, returning the proof-carrying wrapper on success.
    pub fn check_signature(self) -> Result<SignatureCheckedTransaction> {
        self.authenticator.verify(&self.raw_txn)?;
        Ok(SignatureCheckedTransaction(self))
    }
}

/// A transaction for which the signature has been verified. Created by
/// [`SignedTransaction::check_signature`] and [`RawTransaction::sign`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureCheckedTransaction(SignedTransaction);

impl SignatureCheckedTransaction {
    /// Returns the `SignedTransaction` within.
    pub fn into_inner(self) -> SignedTransaction {
        self.0
    }

    /// Returns the `RawTransaction` within.
    pub fn into_raw_transaction(self) -> RawTransaction {
        self.0.into_raw_transaction()
    }
}

impl Deref for SignatureCheckedTransaction {
    type Target = SignedTransaction;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The ledger-level transaction enum. The SDK only ever occupies the first
/// variant, but the variant tag is part of the committed-hash preimage and
/// must match the chain's.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Transaction {
    /// Transaction submitted by a user.
    UserTransaction(SignedTransaction),
}

aptos_crypto::define_crypto_hasher!(RawTransaction, RawTransactionHasher);
aptos_crypto::define_crypto_hasher!(RawTransactionWithData, RawTransactionWithDataHasher);
aptos_crypto::define_crypto_hasher!(Transaction, TransactionHasher);

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;
    use crate::identifier::Identifier;
    use crate::language_storage::ModuleId;

    /// A stable entry-function transaction used across signing tests.
    pub(crate) fn raw_transaction_fixture() -> RawTransaction {
        let entry_function = EntryFunction::new(
            ModuleId::new(AccountAddress::ONE, Identifier::new("aptos_account").unwrap()),
            Identifier::new("transfer").unwrap(),
            vec![],
            vec![
                aptos_bcs::to_bytes(&AccountAddress::TWO).unwrap(),
                aptos_bcs::to_bytes(&1000u64).unwrap(),
            ],
        );
        RawTransaction::new_entry_function(
            AccountAddress::from_hex_literal("0xcafe").unwrap(),
            7,
            entry_function,
            100_000,
            100,
            1_700_000_000,
            ChainId::test(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{test_helpers::raw_transaction_fixture, *};
    use aptos_crypto::traits::{PrivateKey, Uniform};
    use rand::{rngs::StdRng, SeedableRng};

    fn ed25519_key() -> Ed25519PrivateKey {
        let mut rng = StdRng::from_seed([11u8; 32]);
        Ed25519PrivateKey::generate(&mut rng)
    }

    #[test]
    fn signing_message_is_salt_then_bcs() {
        let raw_txn = raw_transaction_fixture();
        let message = raw_txn.signing_message().unwrap();
        let seed = HashValue::sha3_256_of(b"APTOS::RawTransaction");
        assert_eq!(&message[..32], seed.as_ref());
        assert_eq!(&message[32..], aptos_bcs::to_bytes(&raw_txn).unwrap().as_slice());

        let wrapped = RawTransactionWithData::new_multi_agent(raw_txn, vec![]);
        let message = signing_message(&wrapped).unwrap();
        let seed = HashValue::sha3_256_of(b"APTOS::RawTransactionWithData");
        assert_eq!(&message[..32], seed.as_ref());
    }

    #[test]
    fn payload_wire_tags() {
        let raw_txn = raw_transaction_fixture();
        let bytes = aptos_bcs::to_bytes(raw_txn.payload()).unwrap();
        assert_eq!(bytes[0], 2); // EntryFunction

        let script_payload =
            TransactionPayload::Script(Script::new(vec![0x01], vec![], vec![]));
        assert_eq!(aptos_bcs::to_bytes(&script_payload).unwrap()[0], 0);

        let multisig_payload = TransactionPayload::Multisig(Multisig {
            multisig_address: AccountAddress::TWO,
            transaction_payload: None,
        });
        assert_eq!(aptos_bcs::to_bytes(&multisig_payload).unwrap()[0], 3);

        let versioned = TransactionPayload::Payload(TransactionPayloadInner::V1 {
            executable: TransactionExecutable::Empty,
            extra_config: TransactionExtraConfig::V1 {
                multisig_address: None,
                replay_protection_nonce: Some(5),
            },
        });
        assert_eq!(aptos_bcs::to_bytes(&versioned).unwrap()[0], 4);
    }

    #[test]
    fn module_bundles_decode_but_refuse_to_encode() {
        // Tag 1, one module, two bytes of code.
        let legacy_bytes = vec![1u8, 1, 2, 0xde, 0xad];
        let decoded: TransactionPayload = aptos_bcs::from_bytes(&legacy_bytes).unwrap();
        assert!(matches!(decoded, TransactionPayload::ModuleBundle(_)));
        assert!(aptos_bcs::to_bytes(&decoded).is_err());
    }

    #[test]
    fn orderless_transactions_pin_the_sequence_number() {
        let raw_txn = RawTransaction::new_txn(
            AccountAddress::ONE,
            ReplayProtector::Nonce(77),
            TransactionExecutable::Empty,
            None,
            100_000,
            100,
            1_700_000_000,
            ChainId::test(),
        );
        assert_eq!(raw_txn.sequence_number(), u64::MAX);
        assert_eq!(raw_txn.replay_protector(), ReplayProtector::Nonce(77));

        let ordinary = raw_transaction_fixture();
        assert_eq!(
            ordinary.replay_protector(),
            ReplayProtector::SequenceNumber(7)
        );
    }

    #[test]
    fn sign_then_check_signature() {
        let private_key = ed25519_key();
        let public_key = private_key.public_key();
        let signed = raw_transaction_fixture()
            .sign(&private_key, public_key)
            .unwrap()
            .into_inner();
        let checked = signed.check_signature().unwrap();
        assert_eq!(checked.sequence_number(), 7);
    }

    #[test]
    fn tampered_signed_transaction_fails_the_check() {
        let private_key = ed25519_key();
        let signed = raw_transaction_fixture()
            .sign(&private_key, private_key.public_key())
            .unwrap()
            .into_inner();

        let other_raw = RawTransaction::new_entry_function(
            AccountAddress::from_hex_literal("0xcafe").unwrap(),
            8, // different sequence number than what was signed
            match signed.payload().clone() {
                TransactionPayload::EntryFunction(entry_function) => entry_function,
                _ => unreachable!(),
            },
            100_000,
            100,
            1_700_000_000,
            ChainId::test(),
        );
        let forged =
            SignedTransaction::new_signed_transaction(other_raw, signed.authenticator());
        assert!(forged.check_signature().is_err());
    }

    #[test]
    fn multi_agent_signing_roundtrip() {
        let sender_key = ed25519_key();
        let mut rng = StdRng::from_seed([12u8; 32]);
        let secondary_key = Ed25519PrivateKey::generate(&mut rng);
        let secondary_address = AccountAddress::from_hex_literal("0xb0b").unwrap();

        let checked = raw_transaction_fixture()
            .sign_multi_agent(&sender_key, vec![secondary_address], vec![&secondary_key])
            .unwrap();
        assert!(matches!(
            checked.authenticator_ref(),
            TransactionAuthenticator::MultiAgent { .. }
        ));
        checked.into_inner().check_signature().unwrap();
    }

    #[test]
    fn fee_payer_signing_roundtrip() {
        let sender_key = ed25519_key();
        let mut rng = StdRng::from_seed([13u8; 32]);
        let fee_payer_key = Ed25519PrivateKey::generate(&mut rng);
        let fee_payer_address = AccountAddress::from_hex_literal("0xfee").unwrap();

        let checked = raw_transaction_fixture()
            .sign_fee_payer(&sender_key, vec![], vec![], fee_payer_address, &fee_payer_key)
            .unwrap();
        let signed = checked.into_inner();
        let bytes = aptos_bcs::to_bytes(&signed).unwrap();
        assert_eq!(
            aptos_bcs::from_bytes::<SignedTransaction>(&bytes).unwrap(),
            signed
        );
        signed.check_signature().unwrap();
    }

    #[test]
    fn committed_hash_is_domain_separated_and_deterministic() {
        let private_key = ed25519_key();
        let signed = raw_transaction_fixture()
            .sign(&private_key, private_key.public_key())
            .unwrap()
            .into_inner();

        // Prefix hash of the ledger transaction type, the user-transaction
        // variant tag, then the BCS of the signed transaction itself.
        let mut preimage = HashValue::sha3_256_of(b"APTOS::Transaction").to_vec();
        preimage.push(0);
        preimage.extend(aptos_bcs::to_bytes(&signed).unwrap());
        let expected = HashValue::sha3_256_of(&preimage);

        assert_eq!(signed.committed_hash(), expected);
        // Cached on repeat calls, same value.
        assert_eq!(signed.committed_hash(), expected);
    }

    #[test]
    fn signed_transaction_size_caches() {
        let private_key = ed25519_key();
        let signed = raw_transaction_fixture()
            .sign(&private_key, private_key.public_key())
            .unwrap()
            .into_inner();
        let total = aptos_bcs::serialized_size(&signed).unwrap();
        assert_eq!(signed.txn_bytes_len(), total);
    }
}
