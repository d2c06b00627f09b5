// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Core on-chain types: addresses, identifiers, type tags and their parser,
//! transactions, payloads, and authenticators. Everything here that reaches
//! the wire is BCS-encoded and consensus-visible; the encodings must stay
//! bit-exact.

#![forbid(unsafe_code)]

pub mod account_address;
pub mod chain_id;
pub mod identifier;
pub mod language_storage;
pub mod parser;
pub mod serde_helper;
pub mod transaction;
pub mod transaction_argument;

pub use account_address::AccountAddress;
