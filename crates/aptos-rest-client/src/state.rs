// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use anyhow::{anyhow, Result};

pub const X_APTOS_CHAIN_ID: &str = "x-aptos-chain-id";
pub const X_APTOS_EPOCH: &str = "x-aptos-epoch";
pub const X_APTOS_LEDGER_VERSION: &str = "x-aptos-ledger-version";
pub const X_APTOS_LEDGER_TIMESTAMP: &str = "x-aptos-ledger-timestampusec";

/// Ledger state snapshot the node attaches to every response via the
/// `x-aptos-*` headers.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct State {
    pub chain_id: u8,
    pub epoch: u64,
    pub version: u64,
    pub timestamp_usecs: u64,
}

impl State {
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Result<Self> {
        fn header_u64(headers: &reqwest::header::HeaderMap, name: &str) -> Option<u64> {
            headers
                .get(name)
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse().ok())
        }

        let chain_id = headers
            .get(X_APTOS_CHAIN_ID)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse().ok());
        let epoch = header_u64(headers, X_APTOS_EPOCH);
        let version = header_u64(headers, X_APTOS_LEDGER_VERSION);
        let timestamp_usecs = header_u64(headers, X_APTOS_LEDGER_TIMESTAMP);

        match (chain_id, epoch, version, timestamp_usecs) {
            (Some(chain_id), Some(epoch), Some(version), Some(timestamp_usecs)) => Ok(State {
                chain_id,
                epoch,
                version,
                timestamp_usecs,
            }),
            _ => Err(anyhow!(
                "response is missing ledger state headers: {:?}",
                headers
            )),
        }
    }
}
