// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! An async client for the node's REST API: typed reads, BCS submission,
//! simulation, view calls, and commit polling. The faucet and indexer
//! clients live alongside and share the same conventions.

#![forbid(unsafe_code)]

pub mod error;
pub mod faucet;
pub mod indexer;
mod response;
mod state;
pub mod types;

pub use error::{AptosError, AptosErrorResponse, RestError};
pub use faucet::FaucetClient;
pub use indexer::IndexerClient;
pub use response::Response;
pub use state::State;
pub use types::{
    Account, Block, GasEstimation, HealthCheckSuccess, IndexResponse, MoveResource,
    PendingTransaction, Transaction, TransactionSimulation, ViewFunction,
};

use aptos_crypto::hash::HashValue;
use aptos_types::{
    account_address::AccountAddress, chain_id::ChainId, language_storage::StructTag,
    transaction::SignedTransaction,
};
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Client as ReqwestClient, ClientBuilder as ReqwestClientBuilder,
};
use serde::de::DeserializeOwned;
use std::{collections::BTreeMap, time::Duration};
use tokio::time::Instant;
use url::Url;

pub type Result<T, E = RestError> = std::result::Result<T, E>;

/// Every outbound request identifies the SDK and its version.
pub const X_APTOS_CLIENT: &str = "x-aptos-client";
pub const X_APTOS_CLIENT_VALUE: &str = concat!("aptos-rust-sdk/", env!("CARGO_PKG_VERSION"));

pub const BCS_SIGNED_TRANSACTION: &str = "application/x.aptos.signed_transaction+bcs";
pub const BCS_VIEW_FUNCTION: &str = "application/x.aptos.view_function+bcs";
pub const BCS_CONTENT_TYPE: &str = "application/x-bcs";

pub const DEFAULT_VERSION_PATH_BASE: &str = "v1/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(100);
const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for [`Client`]: base URL plus transport knobs.
pub struct ClientBuilder {
    base_url: Url,
    version_path_base: String,
    timeout: Duration,
    headers: HeaderMap,
}

impl ClientBuilder {
    pub fn new(base_url: Url) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_APTOS_CLIENT,
            HeaderValue::from_static(X_APTOS_CLIENT_VALUE),
        );
        Self {
            base_url,
            version_path_base: DEFAULT_VERSION_PATH_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            headers,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the `v1/` path segment between the base URL and endpoint
    /// paths. Must end with a slash.
    pub fn version_path_base(mut self, base: String) -> Self {
        self.version_path_base = base;
        self
    }

    /// Attaches `Authorization: Bearer <token>` to every request.
    pub fn api_key(mut self, api_key: &str) -> Result<Self> {
        let value = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| RestError::Unknown(e.into()))?;
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }

    /// Adds an arbitrary header to every request.
    pub fn header(mut self, name: &'static str, value: &str) -> Result<Self> {
        let value = HeaderValue::from_str(value).map_err(|e| RestError::Unknown(e.into()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn build(self) -> Client {
        Client {
            inner: ReqwestClientBuilder::new()
                .default_headers(self.headers)
                .timeout(self.timeout)
                .cookie_store(true)
                .build()
                .expect("a statically configured reqwest client always builds"),
            base_url: self.base_url,
            version_path_base: self.version_path_base,
        }
    }
}

/// A client for the node REST API. Cheap to clone; the underlying HTTP
/// client (with its cookie jar, for node affinity behind load balancers) is
/// shared.
#[derive(Clone, Debug)]
pub struct Client {
    inner: ReqwestClient,
    base_url: Url,
    version_path_base: String,
}

impl Client {
    pub fn builder(base_url: Url) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    pub fn new(base_url: Url) -> Self {
        Self::builder(base_url).build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Joins the versioned API base with an endpoint path.
    pub fn build_path(&self, path: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&self.version_path_base)?
            .join(path)?)
    }

    // -- General endpoints --

    /// `GET /` — node info.
    pub async fn get_index(&self) -> Result<Response<IndexResponse>> {
        self.get_json(self.build_path("")?).await
    }

    /// The chain id, from the node info endpoint. Write once, read many:
    /// callers cache this per process.
    pub async fn get_chain_id(&self) -> Result<ChainId> {
        Ok(ChainId::new(self.get_index().await?.inner().chain_id))
    }

    /// `GET /-/healthy?duration_secs=…`.
    pub async fn health_check(&self, seconds: Option<u64>) -> Result<Response<HealthCheckSuccess>> {
        let mut url = self.build_path("-/healthy")?;
        if let Some(seconds) = seconds {
            url.set_query(Some(&format!("duration_secs={}", seconds)));
        }
        self.get_json(url).await
    }

    /// `GET /estimate_gas_price`.
    pub async fn estimate_gas_price(&self) -> Result<Response<GasEstimation>> {
        self.get_json(self.build_path("estimate_gas_price")?).await
    }

    // -- Account endpoints --

    /// `GET /accounts/{address}[?ledger_version=…]` — sequence number and
    /// authentication key.
    pub async fn get_account(
        &self,
        address: AccountAddress,
        ledger_version: Option<u64>,
    ) -> Result<Response<Account>> {
        let mut url = self.build_path(&format!("accounts/{}", address))?;
        if let Some(version) = ledger_version {
            url.set_query(Some(&format!("ledger_version={}", version)));
        }
        self.get_json(url).await
    }

    /// `GET /accounts/{address}/resource/{type}` — one resource, JSON.
    pub async fn get_account_resource(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<Response<MoveResource>> {
        self.get_json(self.build_path(&format!(
            "accounts/{}/resource/{}",
            address, resource_type
        ))?)
        .await
    }

    /// `GET /accounts/{address}/resource/{type}` with a BCS accept header,
    /// decoded into the caller's resource type.
    pub async fn get_account_resource_bcs<T: DeserializeOwned>(
        &self,
        address: AccountAddress,
        resource_type: &str,
    ) -> Result<Response<T>> {
        self.get_bcs(self.build_path(&format!(
            "accounts/{}/resource/{}",
            address, resource_type
        ))?)
        .await
    }

    /// `GET /accounts/{address}/resources` — all resources, JSON.
    pub async fn get_account_resources(
        &self,
        address: AccountAddress,
    ) -> Result<Response<Vec<MoveResource>>> {
        self.get_json(self.build_path(&format!("accounts/{}/resources", address))?)
            .await
    }

    /// `GET /accounts/{address}/resources` with a BCS accept header: the
    /// node answers with a length-prefixed, key-sorted sequence of
    /// (struct tag, resource bytes) records.
    pub async fn get_account_resources_bcs(
        &self,
        address: AccountAddress,
    ) -> Result<Response<BTreeMap<StructTag, Vec<u8>>>> {
        self.get_bcs(self.build_path(&format!("accounts/{}/resources", address))?)
            .await
    }

    // -- Block endpoints --

    /// `GET /blocks/by_height/{height}?with_transactions=…`.
    pub async fn get_block_by_height(
        &self,
        height: u64,
        with_transactions: bool,
    ) -> Result<Response<Block>> {
        let mut url = self.build_path(&format!("blocks/by_height/{}", height))?;
        url.set_query(Some(&format!("with_transactions={}", with_transactions)));
        self.get_json(url).await
    }

    /// `GET /blocks/by_version/{version}?with_transactions=…`.
    pub async fn get_block_by_version(
        &self,
        version: u64,
        with_transactions: bool,
    ) -> Result<Response<Block>> {
        let mut url = self.build_path(&format!("blocks/by_version/{}", version))?;
        url.set_query(Some(&format!("with_transactions={}", with_transactions)));
        self.get_json(url).await
    }

    // -- Transaction endpoints --

    /// `GET /transactions[?start=…&limit=…]`.
    pub async fn get_transactions(
        &self,
        start: Option<u64>,
        limit: Option<u16>,
    ) -> Result<Response<Vec<Transaction>>> {
        let mut url = self.build_path("transactions")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(start) = start {
                query.append_pair("start", &start.to_string());
            }
            if let Some(limit) = limit {
                query.append_pair("limit", &limit.to_string());
            }
        }
        self.get_json(url).await
    }

    /// `GET /transactions/by_hash/{hash}`.
    pub async fn get_transaction_by_hash(
        &self,
        hash: HashValue,
    ) -> Result<Response<Transaction>> {
        self.get_json(self.build_path(&format!(
            "transactions/by_hash/{}",
            hash.to_hex_literal()
        ))?)
        .await
    }

    /// `GET /transactions/by_version/{version}`.
    pub async fn get_transaction_by_version(
        &self,
        version: u64,
    ) -> Result<Response<Transaction>> {
        self.get_json(self.build_path(&format!("transactions/by_version/{}", version))?)
            .await
    }

    /// `POST /transactions` — submit a signed transaction as BCS bytes.
    pub async fn submit(&self, txn: &SignedTransaction) -> Result<Response<PendingTransaction>> {
        let url = self.build_path("transactions")?;
        let body = aptos_bcs::to_bytes(txn)?;
        debug!(
            "submitting transaction from {} with {} byte payload",
            txn.sender(),
            body.len()
        );
        let response = self
            .inner
            .post(url)
            .header(CONTENT_TYPE, BCS_SIGNED_TRANSACTION)
            .body(body)
            .send()
            .await?;
        self.json_response(response).await
    }

    /// `POST /transactions/simulate` — run a transaction without committing
    /// it, to estimate gas. The transaction must carry an invalid (dummy)
    /// signature: the node refuses to simulate something it could commit.
    pub async fn simulate(
        &self,
        txn: &SignedTransaction,
    ) -> Result<Response<Vec<TransactionSimulation>>> {
        if txn.clone().check_signature().is_ok() {
            return Err(RestError::Unknown(anyhow::anyhow!(
                "refusing to simulate a validly signed transaction; use a dummy signature"
            )));
        }
        let url = self.build_path("transactions/simulate")?;
        let response = self
            .inner
            .post(url)
            .header(CONTENT_TYPE, BCS_SIGNED_TRANSACTION)
            .body(aptos_bcs::to_bytes(txn)?)
            .send()
            .await?;
        self.json_response(response).await
    }

    /// `POST /view` — call a read-only function, arguments BCS-encoded.
    pub async fn view_bcs(
        &self,
        request: &ViewFunction,
        ledger_version: Option<u64>,
    ) -> Result<Response<Vec<serde_json::Value>>> {
        let mut url = self.build_path("view")?;
        if let Some(version) = ledger_version {
            url.set_query(Some(&format!("ledger_version={}", version)));
        }
        let response = self
            .inner
            .post(url)
            .header(CONTENT_TYPE, BCS_VIEW_FUNCTION)
            .body(aptos_bcs::to_bytes(request)?)
            .send()
            .await?;
        self.json_response(response).await
    }

    // -- Polling --

    /// Polls `GET /transactions/by_hash/{hash}` until the transaction
    /// commits. A 404 means the node has not seen it yet and retries, as
    /// does a `pending_transaction` answer; a committed transaction
    /// returns; any other error surfaces immediately. Polling is
    /// at-least-once and idempotent on the server.
    pub async fn wait_for_transaction_by_hash(
        &self,
        hash: HashValue,
        period: Option<Duration>,
        timeout: Option<Duration>,
    ) -> Result<Response<Transaction>> {
        let period = period.unwrap_or(DEFAULT_POLL_PERIOD);
        let timeout = timeout.unwrap_or(DEFAULT_POLL_TIMEOUT);
        let deadline = Instant::now() + timeout;

        loop {
            match self.get_transaction_by_hash(hash).await {
                Ok(response) if response.inner().is_pending() => {
                    debug!("transaction {} still pending", hash);
                },
                Ok(response) => return Ok(response),
                Err(err) if err.is_not_found() => {
                    debug!("transaction {} not yet seen by the node", hash);
                },
                Err(err) => return Err(err),
            }
            if Instant::now() >= deadline {
                return Err(RestError::Timeout {
                    hash: hash.to_hex_literal(),
                    timeout_secs: timeout.as_secs(),
                });
            }
            tokio::time::sleep(period).await;
        }
    }

    // -- Transport helpers --

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Response<T>> {
        let response = self.inner.get(url).send().await?;
        self.json_response(response).await
    }

    async fn get_bcs<T: DeserializeOwned>(&self, url: Url) -> Result<Response<T>> {
        let response = self
            .inner
            .get(url)
            .header(ACCEPT, BCS_CONTENT_TYPE)
            .send()
            .await?;
        let response = self.check_response(response).await?;
        let state = State::from_headers(response.headers())?;
        let bytes = response.bytes().await?;
        Ok(Response::new(aptos_bcs::from_bytes(&bytes)?, state))
    }

    async fn json_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Response<T>> {
        let response = self.check_response(response).await?;
        let state = State::from_headers(response.headers())?;
        Ok(Response::new(response.json().await?, state))
    }

    /// Maps a non-2xx answer to a typed error, preferring the node's
    /// structured error body when it parses.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status_code = response.status();
        if status_code.is_success() {
            return Ok(response);
        }
        match response.error_for_status_ref() {
            Err(source) => {
                let error = response
                    .json::<AptosError>()
                    .await
                    .map_err(|_| RestError::Http(status_code, source))?;
                Err(RestError::Api(AptosErrorResponse {
                    error,
                    status_code,
                }))
            },
            Ok(_) => Err(RestError::Unknown(anyhow::anyhow!(
                "non-success status {} reported as success",
                status_code
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_id_header_value() {
        assert!(X_APTOS_CLIENT_VALUE.starts_with("aptos-rust-sdk/"));
    }

    #[test]
    fn paths_are_joined_under_the_version_base() {
        let client = Client::new(Url::parse("https://fullnode.example.com").unwrap());
        assert_eq!(
            client.build_path("estimate_gas_price").unwrap().as_str(),
            "https://fullnode.example.com/v1/estimate_gas_price"
        );
        assert_eq!(
            client
                .build_path("accounts/0x1/resources")
                .unwrap()
                .as_str(),
            "https://fullnode.example.com/v1/accounts/0x1/resources"
        );
    }
}
