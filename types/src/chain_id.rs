// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use anyhow::{ensure, format_err, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A registry of the well-known networks and their one-byte chain ids. A
/// chain id distinguishes chains at the signature level: it is signed into
/// every transaction, so a transaction for one network can never commit on
/// another.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum NamedChain {
    MAINNET = 1,
    TESTNET = 2,
    DEVNET = 3,
    TESTING = 4,
}

impl NamedChain {
    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn from_chain_id(chain_id: &ChainId) -> Result<NamedChain> {
        match chain_id.id() {
            1 => Ok(NamedChain::MAINNET),
            2 => Ok(NamedChain::TESTNET),
            3 => Ok(NamedChain::DEVNET),
            4 => Ok(NamedChain::TESTING),
            id => Err(format_err!("unknown chain id {}", id)),
        }
    }
}

impl FromStr for NamedChain {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(NamedChain::MAINNET),
            "testnet" => Ok(NamedChain::TESTNET),
            "devnet" => Ok(NamedChain::DEVNET),
            "testing" => Ok(NamedChain::TESTING),
            _ => Err(format_err!("not a named chain: {}", s)),
        }
    }
}

impl fmt::Display for NamedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NamedChain::MAINNET => "mainnet",
            NamedChain::TESTNET => "testnet",
            NamedChain::DEVNET => "devnet",
            NamedChain::TESTING => "testing",
        };
        write!(f, "{}", name)
    }
}

/// The one-byte id of the chain a transaction is intended for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
pub struct ChainId(u8);

impl ChainId {
    pub fn new(id: u8) -> Self {
        ChainId(id)
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn mainnet() -> Self {
        ChainId(NamedChain::MAINNET.id())
    }

    pub fn testnet() -> Self {
        ChainId(NamedChain::TESTNET.id())
    }

    /// The id local test networks boot with.
    pub fn test() -> Self {
        ChainId(NamedChain::TESTING.id())
    }

    pub fn is_mainnet(&self) -> bool {
        self.0 == NamedChain::MAINNET.id()
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match NamedChain::from_chain_id(self) {
            Ok(chain) => write!(f, "{}", chain),
            Err(_) => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for ChainId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        ensure!(!s.is_empty(), "cannot create chain id from empty string");
        NamedChain::from_str(s)
            .map(|chain| ChainId(chain.id()))
            .or_else(|_| {
                let id = s.parse::<u8>()?;
                Ok(ChainId(id))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_numeric_parsing() {
        assert_eq!(ChainId::from_str("mainnet").unwrap(), ChainId::mainnet());
        assert_eq!(ChainId::from_str("TESTNET").unwrap(), ChainId::testnet());
        assert_eq!(ChainId::from_str("4").unwrap(), ChainId::test());
        assert_eq!(ChainId::from_str("88").unwrap(), ChainId::new(88));
        assert!(ChainId::from_str("").is_err());
        assert!(ChainId::from_str("not-a-chain").is_err());
    }

    #[test]
    fn bcs_form_is_one_byte() {
        assert_eq!(aptos_bcs::to_bytes(&ChainId::mainnet()).unwrap(), vec![1]);
    }
}
