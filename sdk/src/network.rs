// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! The registry of well-known networks: chain id (0 means "ask the node"),
//! node API base URL, and the optional indexer and faucet endpoints.

use url::Url;

/// Connection endpoints for one network.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NetworkConfig {
    pub name: &'static str,
    /// The expected chain id; 0 means unknown, fetch from the node.
    pub chain_id: u8,
    pub node_url: &'static str,
    pub indexer_url: Option<&'static str>,
    pub faucet_url: Option<&'static str>,
}

impl NetworkConfig {
    pub fn node_api_url(&self) -> Url {
        Url::parse(self.node_url).expect("registry URLs are well-formed")
    }

    pub fn indexer_api_url(&self) -> Option<Url> {
        self.indexer_url
            .map(|url| Url::parse(url).expect("registry URLs are well-formed"))
    }

    pub fn faucet_api_url(&self) -> Option<Url> {
        self.faucet_url
            .map(|url| Url::parse(url).expect("registry URLs are well-formed"))
    }
}

/// A node started by the local testnet tooling.
pub const LOCALNET: NetworkConfig = NetworkConfig {
    name: "localnet",
    chain_id: 4,
    node_url: "http://localhost:8080",
    indexer_url: Some("http://localhost:8090/v1/graphql"),
    faucet_url: Some("http://localhost:8081"),
};

/// Devnet resets regularly; its chain id changes with every reset and must
/// be fetched.
pub const DEVNET: NetworkConfig = NetworkConfig {
    name: "devnet",
    chain_id: 0,
    node_url: "https://api.devnet.aptoslabs.com",
    indexer_url: Some("https://api.devnet.aptoslabs.com/v1/graphql"),
    faucet_url: Some("https://faucet.devnet.aptoslabs.com"),
};

pub const TESTNET: NetworkConfig = NetworkConfig {
    name: "testnet",
    chain_id: 2,
    node_url: "https://api.testnet.aptoslabs.com",
    indexer_url: Some("https://api.testnet.aptoslabs.com/v1/graphql"),
    faucet_url: Some("https://faucet.testnet.aptoslabs.com"),
};

/// Mainnet has no faucet.
pub const MAINNET: NetworkConfig = NetworkConfig {
    name: "mainnet",
    chain_id: 1,
    node_url: "https://api.mainnet.aptoslabs.com",
    indexer_url: Some("https://api.mainnet.aptoslabs.com/v1/graphql"),
    faucet_url: None,
};

/// Looks a network up by name.
pub fn named_network(name: &str) -> Option<&'static NetworkConfig> {
    match name.to_ascii_lowercase().as_str() {
        "localnet" | "local" => Some(&LOCALNET),
        "devnet" => Some(&DEVNET),
        "testnet" => Some(&TESTNET),
        "mainnet" => Some(&MAINNET),
        _ => None,
    }
}
