// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{account_address::AccountAddress, transaction::EntryFunction};
use serde::{Deserialize, Serialize};

/// A multisig transaction: an owner of a multisig account executes a
/// pre-approved payload as the multisig account.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Multisig {
    pub multisig_address: AccountAddress,

    /// The payload is optional on the wire: if it was stored on-chain at
    /// creation time, execution can refer to it by the multisig address
    /// alone.
    pub transaction_payload: Option<MultisigTransactionPayload>,
}

/// The payload of the multisig transaction. Scripts are intentionally not
/// representable here; only entry functions can be pre-approved.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MultisigTransactionPayload {
    EntryFunction(EntryFunction),
}
