// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! A thin GraphQL client for the indexer: queries are POSTed as a JSON
//! envelope and the typed `data` payload is extracted, with GraphQL-level
//! errors surfaced as request failures.

use crate::{RestError, Result};
use aptos_types::account_address::AccountAddress;
use reqwest::{Client as ReqwestClient, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// One row of the `current_coin_balances` table.
#[derive(Clone, Debug, Deserialize)]
pub struct CoinBalance {
    pub owner_address: String,
    pub coin_type: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: u128,
}

/// One row of the `processor_status` table: how far each indexer processor
/// has caught up.
#[derive(Clone, Debug, Deserialize)]
pub struct ProcessorStatus {
    pub processor: String,
    pub last_success_version: u64,
}

#[derive(Deserialize)]
struct CoinBalancesData {
    current_coin_balances: Vec<CoinBalance>,
}

#[derive(Deserialize)]
struct ProcessorStatusData {
    processor_status: Vec<ProcessorStatus>,
}

/// The indexer's numeric columns arrive as JSON numbers or strings
/// depending on the table's column type.
fn deserialize_amount<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    use serde::de::Error;
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| D::Error::custom("amount out of range")),
        serde_json::Value::String(s) => s.parse().map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "unexpected amount representation: {}",
            other
        ))),
    }
}

/// A client for the indexer's GraphQL endpoint.
#[derive(Clone, Debug)]
pub struct IndexerClient {
    inner: ReqwestClient,
    url: Url,
}

impl IndexerClient {
    pub fn new(url: Url) -> Self {
        Self {
            inner: ReqwestClient::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("a statically configured reqwest client always builds"),
            url,
        }
    }

    /// Runs a raw GraphQL query and decodes its `data` object.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .inner
            .post(self.url.clone())
            .json(&GraphqlRequest { query, variables })
            .send()
            .await?;
        let status_code = response.status();
        if !status_code.is_success() {
            return Err(RestError::Unknown(anyhow::anyhow!(
                "indexer returned {}",
                status_code
            )));
        }
        let envelope: GraphqlResponse<T> = response.json().await?;
        if let Some(errors) = envelope.errors {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(RestError::Unknown(anyhow::anyhow!(
                "graphql errors: {}",
                messages.join("; ")
            )));
        }
        envelope
            .data
            .ok_or_else(|| RestError::Unknown(anyhow::anyhow!("graphql response without data")))
    }

    /// All current coin balances held by `address`.
    pub async fn get_coin_balances(
        &self,
        address: AccountAddress,
    ) -> Result<Vec<CoinBalance>> {
        const QUERY: &str = r#"
            query CoinBalances($owner: String) {
                current_coin_balances(where: {owner_address: {_eq: $owner}}) {
                    owner_address
                    coin_type
                    amount
                }
            }
        "#;
        let data: CoinBalancesData = self
            .query(
                QUERY,
                serde_json::json!({ "owner": address.to_standard_string() }),
            )
            .await?;
        Ok(data.current_coin_balances)
    }

    /// The ledger version each indexer processor has reached. Useful for
    /// waiting until the indexer has caught up with a submitted
    /// transaction.
    pub async fn get_processor_statuses(&self) -> Result<Vec<ProcessorStatus>> {
        const QUERY: &str = r#"
            query ProcessorStatus {
                processor_status {
                    processor
                    last_success_version
                }
            }
        "#;
        let data: ProcessorStatusData = self.query(QUERY, serde_json::json!({})).await?;
        Ok(data.processor_status)
    }
}
