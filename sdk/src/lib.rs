// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The Aptos Rust SDK.
//!
//! The modules here compose the lower-level crates into a client-side
//! workflow: hold an account ([`types::LocalAccount`]), build transactions
//! ([`transaction_builder::TransactionFactory`]), and either submit them
//! one at a time through [`rest_client::Client`] or stream them through the
//! concurrent [`transaction_pipeline`].

#![forbid(unsafe_code)]

pub mod coin_client;
pub mod network;
pub mod transaction_builder;
pub mod transaction_pipeline;
pub mod types;

pub mod bcs {
    pub use aptos_bcs::*;
}

pub mod crypto {
    pub use aptos_crypto::*;
}

pub mod move_types {
    pub use aptos_types::{
        account_address, identifier, language_storage, parser, transaction_argument,
    };
}

pub mod rest_client {
    pub use aptos_rest_client::*;
}
