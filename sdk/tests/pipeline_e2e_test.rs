// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests against a running localnet. Ignored by default; run a
//! local node + faucet (e.g. the CLI's localnet) and then
//! `cargo test -- --ignored`.

use aptos_sdk::{
    coin_client::CoinClient,
    network::LOCALNET,
    rest_client::{Client, FaucetClient},
    transaction_builder::TransactionFactory,
    transaction_pipeline::{PipelineConfig, TransactionPipeline},
    types::LocalAccount,
};
use aptos_types::{
    account_address::AccountAddress,
    identifier::Identifier,
    language_storage::ModuleId,
    transaction::{EntryFunction, TransactionPayload},
};
use std::{collections::BTreeSet, sync::Arc};

fn transfer_payload(to: AccountAddress, amount: u64) -> TransactionPayload {
    TransactionPayload::EntryFunction(EntryFunction::new(
        ModuleId::new(
            AccountAddress::ONE,
            Identifier::new("aptos_account").unwrap(),
        ),
        Identifier::new("transfer").unwrap(),
        vec![],
        vec![
            aptos_bcs::to_bytes(&to).unwrap(),
            aptos_bcs::to_bytes(&amount).unwrap(),
        ],
    ))
}

#[tokio::test]
#[ignore]
async fn pipeline_commits_100_contiguous_transactions() {
    let client = Client::new(LOCALNET.node_api_url());
    let faucet = FaucetClient::new(LOCALNET.faucet_api_url().unwrap(), LOCALNET.node_api_url());

    let sender = Arc::new(LocalAccount::generate(&mut rand::rngs::OsRng));
    let receiver = LocalAccount::generate(&mut rand::rngs::OsRng);
    faucet.fund(sender.address(), 100_000_000).await.unwrap();
    faucet.create_account(receiver.address()).await.unwrap();

    let chain_id = client.get_chain_id().await.unwrap();
    let start_sequence_number = client
        .get_account(sender.address(), None)
        .await
        .unwrap()
        .inner()
        .sequence_number
        .0;

    let pipeline = TransactionPipeline::start(
        client.clone(),
        sender.clone(),
        TransactionFactory::new(chain_id),
        PipelineConfig::default(),
    )
    .await
    .unwrap();

    for id in 0..100u64 {
        pipeline
            .submit(id, transfer_payload(receiver.address(), 1))
            .await
            .unwrap();
    }
    pipeline.close();

    let mut ids = BTreeSet::new();
    let mut sequence_numbers = BTreeSet::new();
    let mut hashes = Vec::new();
    while let Some(outcome) = pipeline.next_outcome().await {
        let pending = outcome.result.unwrap();
        ids.insert(outcome.id);
        sequence_numbers.insert(outcome.sequence_number);
        hashes.push(pending.hash);
    }
    // The outcome channel closed exactly once, after every request.
    assert!(pipeline.next_outcome().await.is_none());

    assert_eq!(ids, (0..100).collect::<BTreeSet<u64>>());
    assert_eq!(
        sequence_numbers,
        (start_sequence_number..start_sequence_number + 100).collect::<BTreeSet<u64>>()
    );

    for hash in hashes {
        let hash = aptos_sdk::crypto::HashValue::from_hex_literal(&hash).unwrap();
        let committed = client
            .wait_for_transaction_by_hash(hash, None, None)
            .await
            .unwrap();
        assert_eq!(committed.inner().success(), Some(true));
    }
}

#[tokio::test]
#[ignore]
async fn coin_transfer_flow() {
    let client = Client::new(LOCALNET.node_api_url());
    let faucet = FaucetClient::new(LOCALNET.faucet_api_url().unwrap(), LOCALNET.node_api_url());
    let coin_client = CoinClient::new(&client);

    let alice = LocalAccount::generate(&mut rand::rngs::OsRng);
    let bob = LocalAccount::generate(&mut rand::rngs::OsRng);
    faucet.fund(alice.address(), 100_000_000).await.unwrap();
    faucet.fund(bob.address(), 0).await.unwrap();

    // The account endpoint seeds the local tracker.
    let on_chain = client.get_account(alice.address(), None).await.unwrap();
    alice.set_sequence_number(on_chain.inner().sequence_number.0);

    let pending = coin_client
        .transfer(&alice, bob.address(), 1_000, None)
        .await
        .unwrap();
    let hash = aptos_sdk::crypto::HashValue::from_hex_literal(&pending.hash).unwrap();
    client
        .wait_for_transaction_by_hash(hash, None, None)
        .await
        .unwrap();

    assert_eq!(
        coin_client.get_account_balance(&bob.address()).await.unwrap(),
        1_000
    );
}
