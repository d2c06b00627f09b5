// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! A library supplying the cryptographic primitives the SDK signs and
//! verifies with: Ed25519 (plus the legacy MultiEd25519 aggregate),
//! secp256k1 and secp256r1 ECDSA, SLH-DSA wire material, and the
//! domain-separated hashing every signing transcript starts with.

#![forbid(unsafe_code)]

pub mod ed25519;
pub mod hash;
pub mod multi_ed25519;
pub mod secp256k1_ecdsa;
pub mod secp256r1_ecdsa;
pub mod slh_dsa;
pub mod test_utils;
pub mod traits;

pub use self::traits::*;
pub use hash::HashValue;

// Re-exports consumed by the `define_crypto_hasher!` macro expansion in
// downstream crates.
#[doc(hidden)]
pub use aptos_bcs as _aptos_bcs;
#[doc(hidden)]
pub use once_cell as _once_cell;

#[cfg(test)]
mod unit_tests;
