// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! Funds two fresh accounts on localnet, then has Alice send Bob some APT.
//! Run a localnet (node + faucet) first.

use anyhow::{Context, Result};
use aptos_sdk::{
    coin_client::CoinClient,
    network::LOCALNET,
    rest_client::{Client, FaucetClient},
    types::LocalAccount,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let rest_client = Client::new(LOCALNET.node_api_url());
    let faucet_client = FaucetClient::new(
        LOCALNET.faucet_api_url().expect("localnet has a faucet"),
        LOCALNET.node_api_url(),
    );
    let coin_client = CoinClient::new(&rest_client);

    // Create two accounts, Alice and Bob, and fund Alice but not Bob.
    let alice = LocalAccount::generate(&mut rand::rngs::OsRng);
    let bob = LocalAccount::generate(&mut rand::rngs::OsRng);

    println!("=== Addresses ===");
    println!("Alice: {}", alice.address());
    println!("Bob: {}", bob.address());

    faucet_client
        .fund(alice.address(), 100_000_000)
        .await
        .context("Failed to fund Alice's account")?;
    faucet_client
        .create_account(bob.address())
        .await
        .context("Failed to create Bob's account")?;

    println!("\n=== Initial Balances ===");
    println!(
        "Alice: {}",
        coin_client.get_account_balance(&alice.address()).await?
    );

    // The tracker starts from the on-chain sequence number.
    let account = rest_client.get_account(alice.address(), None).await?;
    alice.set_sequence_number(account.inner().sequence_number.0);

    // Have Alice send Bob some coins.
    let pending = coin_client
        .transfer(&alice, bob.address(), 1_000, None)
        .await
        .context("Failed to submit the transfer")?;
    let hash = aptos_sdk::crypto::HashValue::from_hex_literal(&pending.hash)?;
    rest_client
        .wait_for_transaction_by_hash(hash, None, None)
        .await
        .context("Failed waiting for the transfer to commit")?;

    println!("\n=== Final Balances ===");
    println!(
        "Alice: {}",
        coin_client.get_account_balance(&alice.address()).await?
    );
    println!(
        "Bob: {}",
        coin_client.get_account_balance(&bob.address()).await?
    );

    Ok(())
}
