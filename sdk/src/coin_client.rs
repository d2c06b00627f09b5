// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{
    transaction_builder::TransactionFactory,
    types::LocalAccount,
};
use anyhow::{Context, Result};
use aptos_rest_client::{Client as ApiClient, PendingTransaction};
use aptos_types::{
    account_address::AccountAddress,
    chain_id::ChainId,
    identifier::Identifier,
    language_storage::ModuleId,
    transaction::EntryFunction,
};

#[derive(Clone, Debug)]
pub struct CoinClient<'a> {
    api_client: &'a ApiClient,
}

#[derive(Clone, Debug)]
pub struct TransactionOptions {
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,

    /// This is the number of seconds from now you're willing to wait for the
    /// transaction to be committed.
    pub timeout_secs: u64,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            max_gas_amount: crate::transaction_builder::DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: crate::transaction_builder::DEFAULT_GAS_UNIT_PRICE,
            timeout_secs: crate::transaction_builder::DEFAULT_TXN_EXPIRATION_SECS,
        }
    }
}

impl<'a> CoinClient<'a> {
    pub fn new(api_client: &'a ApiClient) -> Self {
        Self { api_client }
    }

    async fn get_chain_id(&self) -> Result<ChainId> {
        self.api_client
            .get_chain_id()
            .await
            .context("Failed to get chain ID")
    }

    /// Transfers APT from `from_account` to `to_account`, allocating the
    /// next sequence number from the sender's tracker.
    pub async fn transfer(
        &self,
        from_account: &LocalAccount,
        to_account: AccountAddress,
        amount: u64,
        options: Option<TransactionOptions>,
    ) -> Result<PendingTransaction> {
        let options = options.unwrap_or_default();
        let factory = TransactionFactory::new(self.get_chain_id().await?)
            .with_gas_unit_price(options.gas_unit_price)
            .with_max_gas_amount(options.max_gas_amount)
            .with_transaction_expiration_secs(options.timeout_secs);

        let payload = EntryFunction::new(
            ModuleId::new(
                AccountAddress::ONE,
                Identifier::new("aptos_account").expect("valid module name"),
            ),
            Identifier::new("transfer").expect("valid function name"),
            vec![],
            vec![
                aptos_bcs::to_bytes(&to_account)?,
                aptos_bcs::to_bytes(&amount)?,
            ],
        );

        let signed_txn =
            from_account.sign_with_transaction_builder(factory.entry_function(payload))?;
        Ok(self
            .api_client
            .submit(&signed_txn)
            .await
            .context("Failed to submit transfer transaction")?
            .into_inner())
    }

    /// The APT balance of `address`, read from its coin store resource.
    pub async fn get_account_balance(&self, address: &AccountAddress) -> Result<u64> {
        let response = self
            .api_client
            .get_account_resource(
                *address,
                "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>",
            )
            .await
            .context("Failed to get account balance")?;
        response
            .inner()
            .data
            .get("coin")
            .and_then(|field| field.get("value"))
            .and_then(|value| value.as_str())
            .and_then(|value| value.parse::<u64>().ok())
            .context("Failed to parse the coin store balance")
    }
}
