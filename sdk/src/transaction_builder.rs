// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use aptos_types::{
    account_address::AccountAddress,
    chain_id::ChainId,
    transaction::{
        EntryFunction, Multisig, RawTransaction, ReplayProtector, Script, TransactionExecutable,
        TransactionExtraConfig, TransactionPayload, TransactionPayloadInner,
    },
};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default cap on total gas spent by one transaction.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 100_000;
/// Default price per gas unit, in octas.
pub const DEFAULT_GAS_UNIT_PRICE: u64 = 100;
/// Default window, in seconds from now, before a built transaction expires.
pub const DEFAULT_TXN_EXPIRATION_SECS: u64 = 300;

/// One transaction in the making: the payload plus every field of the raw
/// transaction, some still waiting to be filled in. `sender` and
/// `sequence_number` usually come from a `LocalAccount` at signing time.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    sender: Option<AccountAddress>,
    sequence_number: Option<u64>,
    payload: TransactionPayload,
    max_gas_amount: u64,
    gas_unit_price: u64,
    expiration_timestamp_secs: u64,
    chain_id: ChainId,
}

impl TransactionBuilder {
    pub fn sender(mut self, sender: AccountAddress) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = max_gas_amount;
        self
    }

    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = gas_unit_price;
        self
    }

    pub fn expiration_timestamp_secs(mut self, expiration_timestamp_secs: u64) -> Self {
        self.expiration_timestamp_secs = expiration_timestamp_secs;
        self
    }

    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Upgrades the payload to the versioned format with a replay
    /// protection nonce, producing an orderless transaction.
    pub fn replay_protection_nonce(mut self, nonce: u64) -> Self {
        let executable = match self.payload {
            TransactionPayload::EntryFunction(entry_function) => {
                TransactionExecutable::EntryFunction(entry_function)
            },
            TransactionPayload::Script(script) => TransactionExecutable::Script(script),
            TransactionPayload::Payload(TransactionPayloadInner::V1 { executable, .. }) => {
                executable
            },
            other => {
                self.payload = other;
                return self;
            },
        };
        self.payload = TransactionPayload::Payload(TransactionPayloadInner::V1 {
            executable,
            extra_config: TransactionExtraConfig::V1 {
                multisig_address: None,
                replay_protection_nonce: Some(nonce),
            },
        });
        self.sequence_number = Some(u64::MAX);
        self
    }

    pub fn build(self) -> RawTransaction {
        RawTransaction::new(
            self.sender.expect("sender must have been set"),
            self.sequence_number
                .expect("sequence number must have been set"),
            self.payload,
            self.max_gas_amount,
            self.gas_unit_price,
            self.expiration_timestamp_secs,
            self.chain_id,
        )
    }
}

/// Produces [`TransactionBuilder`]s pre-filled with one network's chain id
/// and this application's gas and expiration policy. One factory per
/// process is typical; the chain id is fetched once and baked in.
#[derive(Clone, Debug)]
pub struct TransactionFactory {
    max_gas_amount: u64,
    gas_unit_price: u64,
    transaction_expiration_secs: u64,
    chain_id: ChainId,
}

impl TransactionFactory {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: DEFAULT_GAS_UNIT_PRICE,
            transaction_expiration_secs: DEFAULT_TXN_EXPIRATION_SECS,
            chain_id,
        }
    }

    pub fn with_max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.max_gas_amount = max_gas_amount;
        self
    }

    pub fn with_gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.gas_unit_price = gas_unit_price;
        self
    }

    pub fn with_transaction_expiration_secs(mut self, secs: u64) -> Self {
        self.transaction_expiration_secs = secs;
        self
    }

    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn get_max_gas_amount(&self) -> u64 {
        self.max_gas_amount
    }

    pub fn get_gas_unit_price(&self) -> u64 {
        self.gas_unit_price
    }

    pub fn get_chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn payload(&self, payload: TransactionPayload) -> TransactionBuilder {
        self.transaction_builder(payload)
    }

    pub fn entry_function(&self, func: EntryFunction) -> TransactionBuilder {
        self.payload(TransactionPayload::EntryFunction(func))
    }

    pub fn script(&self, script: Script) -> TransactionBuilder {
        self.payload(TransactionPayload::Script(script))
    }

    pub fn multisig(&self, multisig: Multisig) -> TransactionBuilder {
        self.payload(TransactionPayload::Multisig(multisig))
    }

    /// A versioned-payload builder with an explicit replay protector.
    pub fn executable(
        &self,
        executable: TransactionExecutable,
        replay_protector: ReplayProtector,
    ) -> TransactionBuilder {
        let (sequence_number, nonce) = match replay_protector {
            ReplayProtector::SequenceNumber(sequence_number) => (Some(sequence_number), None),
            ReplayProtector::Nonce(nonce) => (Some(u64::MAX), Some(nonce)),
        };
        let mut builder = self.transaction_builder(TransactionPayload::Payload(
            TransactionPayloadInner::V1 {
                executable,
                extra_config: TransactionExtraConfig::V1 {
                    multisig_address: None,
                    replay_protection_nonce: nonce,
                },
            },
        ));
        builder.sequence_number = sequence_number;
        builder
    }

    fn transaction_builder(&self, payload: TransactionPayload) -> TransactionBuilder {
        TransactionBuilder {
            sender: None,
            sequence_number: None,
            payload,
            max_gas_amount: self.max_gas_amount,
            gas_unit_price: self.gas_unit_price,
            expiration_timestamp_secs: self.expiration_timestamp(),
            chain_id: self.chain_id,
        }
    }

    /// Wall-clock now plus the configured expiration window.
    fn expiration_timestamp(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("the clock is set after 1970")
            .as_secs()
            + self.transaction_expiration_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptos_types::{identifier::Identifier, language_storage::ModuleId};

    fn transfer() -> EntryFunction {
        EntryFunction::new(
            ModuleId::new(
                AccountAddress::ONE,
                Identifier::new("aptos_account").unwrap(),
            ),
            Identifier::new("transfer").unwrap(),
            vec![],
            vec![],
        )
    }

    #[test]
    fn defaults_are_applied() {
        let factory = TransactionFactory::new(ChainId::test());
        let raw_txn = factory
            .entry_function(transfer())
            .sender(AccountAddress::ONE)
            .sequence_number(0)
            .build();
        assert_eq!(raw_txn.max_gas_amount(), DEFAULT_MAX_GAS_AMOUNT);
        assert_eq!(raw_txn.gas_unit_price(), DEFAULT_GAS_UNIT_PRICE);
        assert_eq!(raw_txn.chain_id(), ChainId::test());
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let expiration = raw_txn.expiration_timestamp_secs();
        assert!(expiration >= now + DEFAULT_TXN_EXPIRATION_SECS - 5);
        assert!(expiration <= now + DEFAULT_TXN_EXPIRATION_SECS + 5);
    }

    #[test]
    fn overrides_are_applied() {
        let factory = TransactionFactory::new(ChainId::test())
            .with_max_gas_amount(5_000)
            .with_gas_unit_price(250);
        let raw_txn = factory
            .entry_function(transfer())
            .sender(AccountAddress::ONE)
            .sequence_number(9)
            .expiration_timestamp_secs(123)
            .build();
        assert_eq!(raw_txn.max_gas_amount(), 5_000);
        assert_eq!(raw_txn.gas_unit_price(), 250);
        assert_eq!(raw_txn.sequence_number(), 9);
        assert_eq!(raw_txn.expiration_timestamp_secs(), 123);
    }

    #[test]
    fn nonce_builder_produces_an_orderless_transaction() {
        let factory = TransactionFactory::new(ChainId::test());
        let raw_txn = factory
            .entry_function(transfer())
            .replay_protection_nonce(42)
            .sender(AccountAddress::ONE)
            .build();
        assert_eq!(raw_txn.sequence_number(), u64::MAX);
        assert_eq!(raw_txn.replay_protector(), ReplayProtector::Nonce(42));
    }
}
