// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! JSON models for the node REST API. Only the fields the SDK consumes are
//! typed; unknown fields are ignored, matching the API's additive evolution.

use aptos_types::{
    account_address::AccountAddress,
    identifier::Identifier,
    language_storage::{ModuleId, TypeTag},
};
use serde::{de, Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A u64 that travels as a JSON string, the API's convention for values
/// that can exceed 2^53.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct U64(pub u64);

impl U64 {
    pub fn inner(&self) -> &u64 {
        &self.0
    }
}

impl From<u64> for U64 {
    fn from(value: u64) -> Self {
        U64(value)
    }
}

impl From<U64> for u64 {
    fn from(value: U64) -> Self {
        value.0
    }
}

impl fmt::Display for U64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for U64 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for U64 {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct U64Visitor;

        impl de::Visitor<'_> for U64Visitor {
            type Value = U64;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a u64, as a string or a number")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<U64, E> {
                value.parse::<u64>().map(U64).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<U64, E> {
                Ok(U64(value))
            }
        }

        deserializer.deserialize_any(U64Visitor)
    }
}

/// Bytes that travel as a `0x`-prefixed hex string.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct HexEncodedBytes(pub Vec<u8>);

impl HexEncodedBytes {
    pub fn inner(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for HexEncodedBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for HexEncodedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl FromStr for HexEncodedBytes {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(s.strip_prefix("0x").unwrap_or(s)).map(Self)
    }
}

impl Serialize for HexEncodedBytes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HexEncodedBytes {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = <String>::deserialize(deserializer)?;
        encoded.parse().map_err(de::Error::custom)
    }
}

/// `GET /` — node and ledger information.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IndexResponse {
    pub chain_id: u8,
    pub epoch: U64,
    pub ledger_version: U64,
    pub oldest_ledger_version: U64,
    pub ledger_timestamp: U64,
    pub node_role: String,
    pub oldest_block_height: U64,
    pub block_height: U64,
    pub git_hash: Option<String>,
}

/// `GET /accounts/{address}` — replay protection and authentication state.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Account {
    pub sequence_number: U64,
    pub authentication_key: HexEncodedBytes,
}

/// `GET /estimate_gas_price`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct GasEstimation {
    pub deprioritized_gas_estimate: Option<u64>,
    pub gas_estimate: u64,
    pub prioritized_gas_estimate: Option<u64>,
}

/// `GET /-/healthy`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HealthCheckSuccess {
    pub message: String,
}

/// A single resource under an account, JSON-rendered.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MoveResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: serde_json::Value,
}

/// An event attached to a committed transaction.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    pub sequence_number: Option<U64>,
    pub data: serde_json::Value,
}

/// `GET /blocks/...`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Block {
    pub block_height: U64,
    pub block_hash: String,
    pub block_timestamp: U64,
    pub first_version: U64,
    pub last_version: U64,
    pub transactions: Option<Vec<Transaction>>,
}

/// A transaction as the API renders it, discriminated by the `type` field.
/// Pending and user transactions are fully typed (they drive submission and
/// polling); the ledger-internal kinds only carry their common envelope.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transaction {
    PendingTransaction(PendingTransaction),
    UserTransaction(Box<UserTransaction>),
    GenesisTransaction(TransactionSummary),
    BlockMetadataTransaction(TransactionSummary),
    StateCheckpointTransaction(TransactionSummary),
    BlockEpilogueTransaction(TransactionSummary),
    ValidatorTransaction(TransactionSummary),
}

impl Transaction {
    pub fn is_pending(&self) -> bool {
        matches!(self, Transaction::PendingTransaction(_))
    }

    pub fn hash(&self) -> &str {
        match self {
            Transaction::PendingTransaction(txn) => &txn.hash,
            Transaction::UserTransaction(txn) => &txn.hash,
            Transaction::GenesisTransaction(txn)
            | Transaction::BlockMetadataTransaction(txn)
            | Transaction::StateCheckpointTransaction(txn)
            | Transaction::BlockEpilogueTransaction(txn)
            | Transaction::ValidatorTransaction(txn) => &txn.hash,
        }
    }

    pub fn version(&self) -> Option<u64> {
        match self {
            Transaction::PendingTransaction(_) => None,
            Transaction::UserTransaction(txn) => Some(txn.version.0),
            Transaction::GenesisTransaction(txn)
            | Transaction::BlockMetadataTransaction(txn)
            | Transaction::StateCheckpointTransaction(txn)
            | Transaction::BlockEpilogueTransaction(txn)
            | Transaction::ValidatorTransaction(txn) => txn.version.map(|v| v.0),
        }
    }

    /// Whether the transaction executed successfully. Pending transactions
    /// have no verdict yet.
    pub fn success(&self) -> Option<bool> {
        match self {
            Transaction::PendingTransaction(_) => None,
            Transaction::UserTransaction(txn) => Some(txn.success),
            Transaction::GenesisTransaction(txn)
            | Transaction::BlockMetadataTransaction(txn)
            | Transaction::StateCheckpointTransaction(txn)
            | Transaction::BlockEpilogueTransaction(txn)
            | Transaction::ValidatorTransaction(txn) => txn.success,
        }
    }

    pub fn vm_status(&self) -> Option<&str> {
        match self {
            Transaction::PendingTransaction(_) => None,
            Transaction::UserTransaction(txn) => Some(&txn.vm_status),
            Transaction::GenesisTransaction(txn)
            | Transaction::BlockMetadataTransaction(txn)
            | Transaction::StateCheckpointTransaction(txn)
            | Transaction::BlockEpilogueTransaction(txn)
            | Transaction::ValidatorTransaction(txn) => txn.vm_status.as_deref(),
        }
    }
}

/// A submitted transaction the node has accepted but not yet committed.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PendingTransaction {
    pub hash: String,
    pub sender: AccountAddress,
    pub sequence_number: U64,
    pub max_gas_amount: U64,
    pub gas_unit_price: U64,
    pub expiration_timestamp_secs: U64,
    pub payload: serde_json::Value,
}

/// A committed user transaction.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserTransaction {
    pub version: U64,
    pub hash: String,
    pub success: bool,
    pub vm_status: String,
    pub gas_used: U64,
    pub sender: AccountAddress,
    pub sequence_number: U64,
    pub max_gas_amount: U64,
    pub gas_unit_price: U64,
    pub expiration_timestamp_secs: U64,
    pub timestamp: U64,
    pub payload: serde_json::Value,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// The envelope shared by the ledger-internal transaction kinds.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TransactionSummary {
    pub hash: String,
    pub version: Option<U64>,
    pub success: Option<bool>,
    pub vm_status: Option<String>,
    pub timestamp: Option<U64>,
}

/// The result of simulating one transaction: the execution verdict and the
/// gas it would burn, without committing anything.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TransactionSimulation {
    pub success: bool,
    pub vm_status: String,
    pub gas_used: U64,
}

/// The BCS body of `POST /view`: fully qualified function, type arguments,
/// and BCS-encoded value arguments.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ViewFunction {
    pub module: ModuleId,
    pub function: Identifier,
    pub ty_args: Vec<TypeTag>,
    #[serde(with = "aptos_types::serde_helper::vec_bytes")]
    pub args: Vec<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_accepts_strings_and_numbers() {
        assert_eq!(serde_json::from_str::<U64>("\"42\"").unwrap(), U64(42));
        assert_eq!(serde_json::from_str::<U64>("42").unwrap(), U64(42));
        assert!(serde_json::from_str::<U64>("\"not a number\"").is_err());
        assert_eq!(serde_json::to_string(&U64(7)).unwrap(), "\"7\"");
    }

    #[test]
    fn hex_encoded_bytes_roundtrip() {
        let bytes: HexEncodedBytes = "0xdeadbeef".parse().unwrap();
        assert_eq!(bytes.inner(), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(bytes.to_string(), "0xdeadbeef");
        let json = serde_json::to_string(&bytes).unwrap();
        assert_eq!(serde_json::from_str::<HexEncodedBytes>(&json).unwrap(), bytes);
    }

    #[test]
    fn transactions_discriminate_on_type() {
        let pending = serde_json::json!({
            "type": "pending_transaction",
            "hash": "0xabc",
            "sender": "0x1",
            "sequence_number": "3",
            "max_gas_amount": "100000",
            "gas_unit_price": "100",
            "expiration_timestamp_secs": "1700000000",
            "payload": {}
        });
        let txn: Transaction = serde_json::from_value(pending).unwrap();
        assert!(txn.is_pending());
        assert_eq!(txn.hash(), "0xabc");
        assert_eq!(txn.success(), None);

        let user = serde_json::json!({
            "type": "user_transaction",
            "version": "100",
            "hash": "0xdef",
            "success": true,
            "vm_status": "Executed successfully",
            "gas_used": "55",
            "sender": "0x1",
            "sequence_number": "3",
            "max_gas_amount": "100000",
            "gas_unit_price": "100",
            "expiration_timestamp_secs": "1700000000",
            "timestamp": "1700000001",
            "payload": {},
            "events": [],
            "some_future_field": 1
        });
        let txn: Transaction = serde_json::from_value(user).unwrap();
        assert!(!txn.is_pending());
        assert_eq!(txn.success(), Some(true));
        assert_eq!(txn.version(), Some(100));
    }
}
