// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::{Client, RestError, Result};
use aptos_crypto::hash::HashValue;
use aptos_types::account_address::AccountAddress;
use log::debug;
use reqwest::{Client as ReqwestClient, Url};
use std::time::Duration;

/// A client for a test-network faucet: mints coins to an address and waits
/// for the minting transactions to commit before returning.
pub struct FaucetClient {
    faucet_url: Url,
    inner: ReqwestClient,
    rest_client: Client,
}

impl FaucetClient {
    pub fn new(faucet_url: Url, rest_url: Url) -> Self {
        Self {
            faucet_url,
            inner: ReqwestClient::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("a statically configured reqwest client always builds"),
            rest_client: Client::new(rest_url),
        }
    }

    /// Uses an existing REST client (shared transport, test overrides).
    pub fn new_from_rest_client(faucet_url: Url, rest_client: Client) -> Self {
        Self {
            faucet_url,
            inner: ReqwestClient::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("a statically configured reqwest client always builds"),
            rest_client,
        }
    }

    /// Create an account with zero balance.
    pub async fn create_account(&self, address: AccountAddress) -> Result<()> {
        self.mint_and_wait(address, 0).await
    }

    /// Fund an account with the given amount, creating it if necessary.
    pub async fn fund(&self, address: AccountAddress, amount: u64) -> Result<()> {
        self.mint_and_wait(address, amount).await
    }

    /// `POST /mint?address=…&amount=…`. The faucet answers with the hashes
    /// of the transactions it submitted; each must commit before the funds
    /// are observable.
    async fn mint_and_wait(&self, address: AccountAddress, amount: u64) -> Result<()> {
        let mut url = self.faucet_url.clone();
        url.set_path("mint");
        url.set_query(Some(&format!("address={}&amount={}", address, amount)));

        let response = self.inner.post(url).send().await?;
        let status_code = response.status();
        let body = response.text().await?;
        if !status_code.is_success() {
            return Err(RestError::Unknown(anyhow::anyhow!(
                "faucet returned {}: {}",
                status_code,
                body
            )));
        }

        let hashes: Vec<String> =
            serde_json::from_str(&body).map_err(RestError::Json)?;
        debug!("faucet minted {} to {} in {:?}", amount, address, hashes);
        for hash in hashes {
            let hash = HashValue::from_hex_literal(&hash)
                .map_err(|e| RestError::Unknown(e.into()))?;
            self.rest_client
                .wait_for_transaction_by_hash(hash, None, Some(Duration::from_secs(30)))
                .await?;
        }
        Ok(())
    }
}
