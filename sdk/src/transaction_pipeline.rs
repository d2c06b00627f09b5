// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

//! A concurrent submission pipeline for one sender: payloads stream in, and
//! three cooperating stages turn them into submitted transactions.
//!
//! 1. The **builder** allocates sequence numbers from the account's atomic
//!    counter (seeded once from the REST API) and emits raw transactions in
//!    strictly increasing sequence order. A control channel accepts
//!    "set sequence number" messages to reconcile after an observed gap.
//! 2. **Signer workers** (N ≥ 1) apply the signing function. Signing is
//!    CPU-bound and never blocks the I/O stages.
//! 3. The **submitter** POSTs each signed transaction and emits one outcome
//!    per request, tagged with the caller's id.
//!
//! Stage channels are bounded, so a slow submitter back-pressures the
//! builder. Closing the payload channel cascades: the builder drains and
//! exits, the signers finish the remaining build responses, the submitter
//! finishes the remaining signed transactions, and the outcome channel
//! closes exactly once. Order is only guaranteed where it matters:
//! sequence numbers are allocated in order, while outcomes may arrive
//! reordered.
//!
//! A failed request never poisons the pipeline; its outcome carries the
//! error and later payloads keep flowing with their own sequence numbers.

use crate::{transaction_builder::TransactionFactory, types::LocalAccount};
use anyhow::Result;
use aptos_rest_client::{Client, PendingTransaction};
use aptos_types::transaction::{RawTransaction, SignedTransaction, TransactionPayload};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Bounded capacity of each stage channel; the backpressure window between
/// a fast builder and a slow submitter.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 20;
/// Number of signer workers.
pub const DEFAULT_SIGNER_WORKERS: usize = 2;

#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    pub channel_capacity: usize,
    pub signer_workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            signer_workers: DEFAULT_SIGNER_WORKERS,
        }
    }
}

/// One unit of work: a payload and the caller's correlation id.
#[derive(Debug)]
pub struct PayloadRequest {
    pub id: u64,
    pub payload: TransactionPayload,
}

/// A built transaction moving from the builder to a signer.
#[derive(Debug)]
pub(crate) struct BuildResponse {
    pub(crate) id: u64,
    pub(crate) sequence_number: u64,
    pub(crate) raw_txn: RawTransaction,
}

/// A signed transaction moving from a signer to the submitter.
#[derive(Debug)]
pub(crate) struct SignedRequest {
    pub(crate) id: u64,
    pub(crate) sequence_number: u64,
    pub(crate) signed_txn: SignedTransaction,
}

/// The terminal event for one request.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub id: u64,
    pub sequence_number: u64,
    pub result: Result<PendingTransaction>,
}

/// The signing step, pluggable so multi-agent and fee-payer arrangements
/// can reuse the pipeline. The default signs with the account alone.
pub type SignFn = Arc<dyn Fn(RawTransaction) -> Result<SignedTransaction> + Send + Sync>;

/// Handles to a running pipeline. Dropping it does not stop the workers;
/// call [`TransactionPipeline::close`] to start the cascading shutdown and
/// drain outcomes until `None`.
pub struct TransactionPipeline {
    payload_tx: async_channel::Sender<PayloadRequest>,
    control_tx: async_channel::Sender<u64>,
    outcome_rx: async_channel::Receiver<SubmissionOutcome>,
    workers: Vec<JoinHandle<()>>,
}

impl TransactionPipeline {
    /// Seeds the account's sequence tracker from the node, then spawns the
    /// stages. The default signing function signs with `account` alone.
    pub async fn start(
        client: Client,
        account: Arc<LocalAccount>,
        factory: TransactionFactory,
        config: PipelineConfig,
    ) -> Result<Self, aptos_rest_client::RestError> {
        let on_chain = client.get_account(account.address(), None).await?;
        account.set_sequence_number(on_chain.inner().sequence_number.0);
        info!(
            "pipeline for {} starting at sequence number {}",
            account.address(),
            account.sequence_number()
        );

        let signer = account.clone();
        let sign_fn: SignFn = Arc::new(move |raw_txn| signer.sign_transaction(raw_txn));
        Ok(Self::start_with_sign_fn(
            client, account, factory, sign_fn, config,
        ))
    }

    /// Spawns the stages with an explicit signing function and an already
    /// seeded sequence tracker.
    pub fn start_with_sign_fn(
        client: Client,
        account: Arc<LocalAccount>,
        factory: TransactionFactory,
        sign_fn: SignFn,
        config: PipelineConfig,
    ) -> Self {
        let capacity = config.channel_capacity.max(1);
        let (payload_tx, payload_rx) = async_channel::bounded::<PayloadRequest>(capacity);
        let (control_tx, control_rx) = async_channel::bounded::<u64>(capacity);
        let (build_tx, build_rx) = async_channel::bounded::<BuildResponse>(capacity);
        let (signed_tx, signed_rx) = async_channel::bounded::<SignedRequest>(capacity);
        let (outcome_tx, outcome_rx) = async_channel::bounded::<SubmissionOutcome>(capacity);

        let mut workers = Vec::new();
        workers.push(tokio::spawn(build_stage(
            account,
            factory,
            payload_rx,
            control_rx,
            build_tx,
        )));
        for _ in 0..config.signer_workers.max(1) {
            workers.push(tokio::spawn(sign_stage(
                sign_fn.clone(),
                build_rx.clone(),
                signed_tx.clone(),
                outcome_tx.clone(),
            )));
        }
        // The spawned clones keep their stages alive; the originals must
        // not, or the cascade would never finish.
        drop(build_rx);
        drop(signed_tx);

        workers.push(tokio::spawn(submit_stage(client, signed_rx, outcome_tx)));

        Self {
            payload_tx,
            control_tx,
            outcome_rx,
            workers,
        }
    }

    /// Queues a payload. Blocks (asynchronously) when the pipeline is at
    /// capacity; errors if the pipeline was closed.
    pub async fn submit(&self, id: u64, payload: TransactionPayload) -> Result<()> {
        self.payload_tx
            .send(PayloadRequest { id, payload })
            .await
            .map_err(|_| anyhow::anyhow!("pipeline is closed"))
    }

    /// Tells the builder to continue from `sequence_number`, reconciling
    /// the local allocator with observed on-chain state.
    pub async fn set_sequence_number(&self, sequence_number: u64) -> Result<()> {
        self.control_tx
            .send(sequence_number)
            .await
            .map_err(|_| anyhow::anyhow!("pipeline is closed"))
    }

    /// The next outcome, or `None` once the pipeline has fully drained
    /// after [`TransactionPipeline::close`].
    pub async fn next_outcome(&self) -> Option<SubmissionOutcome> {
        self.outcome_rx.recv().await.ok()
    }

    /// Closes the payload channel, triggering the cascading drain. Safe to
    /// call more than once.
    pub fn close(&self) {
        self.payload_tx.close();
        self.control_tx.close();
    }

    /// Closes and waits for every worker to exit.
    pub async fn shutdown(self) {
        self.close();
        let _ = futures::future::join_all(self.workers).await;
    }
}

/// Stage 1: allocate a sequence number per payload and build the raw
/// transaction. Emits in strictly increasing sequence order per sender.
pub(crate) async fn build_stage(
    account: Arc<LocalAccount>,
    factory: TransactionFactory,
    payload_rx: async_channel::Receiver<PayloadRequest>,
    control_rx: async_channel::Receiver<u64>,
    build_tx: async_channel::Sender<BuildResponse>,
) {
    let mut control_open = true;
    loop {
        tokio::select! {
            update = control_rx.recv(), if control_open => {
                match update {
                    Ok(sequence_number) => {
                        warn!(
                            "resetting sequence number for {} to {}",
                            account.address(),
                            sequence_number
                        );
                        account.set_sequence_number(sequence_number);
                    },
                    Err(_) => control_open = false,
                }
            },
            request = payload_rx.recv() => {
                let request = match request {
                    Ok(request) => request,
                    // Input closed and drained: cascade by dropping build_tx.
                    Err(_) => break,
                };
                let sequence_number = account.increment_sequence_number();
                let raw_txn = factory
                    .payload(request.payload)
                    .sender(account.address())
                    .sequence_number(sequence_number)
                    .build();
                debug!("built request {} at sequence number {}", request.id, sequence_number);
                let response = BuildResponse {
                    id: request.id,
                    sequence_number,
                    raw_txn,
                };
                if build_tx.send(response).await.is_err() {
                    break;
                }
            },
        }
    }
}

/// Stage 2: sign. Several workers may run; each exits once the build
/// channel is closed and drained. A signing failure becomes an error
/// outcome rather than stopping the stage.
pub(crate) async fn sign_stage(
    sign_fn: SignFn,
    build_rx: async_channel::Receiver<BuildResponse>,
    signed_tx: async_channel::Sender<SignedRequest>,
    outcome_tx: async_channel::Sender<SubmissionOutcome>,
) {
    while let Ok(response) = build_rx.recv().await {
        let BuildResponse {
            id,
            sequence_number,
            raw_txn,
        } = response;
        match sign_fn(raw_txn) {
            Ok(signed_txn) => {
                if signed_tx
                    .send(SignedRequest {
                        id,
                        sequence_number,
                        signed_txn,
                    })
                    .await
                    .is_err()
                {
                    break;
                }
            },
            Err(err) => {
                warn!("signing request {} failed: {:#}", id, err);
                let outcome = SubmissionOutcome {
                    id,
                    sequence_number,
                    result: Err(err),
                };
                if outcome_tx.send(outcome).await.is_err() {
                    break;
                }
            },
        }
    }
}

/// Stage 3: submit over HTTP and report one outcome per request.
pub(crate) async fn submit_stage(
    client: Client,
    signed_rx: async_channel::Receiver<SignedRequest>,
    outcome_tx: async_channel::Sender<SubmissionOutcome>,
) {
    while let Ok(request) = signed_rx.recv().await {
        let result = client
            .submit(&request.signed_txn)
            .await
            .map(aptos_rest_client::Response::into_inner)
            .map_err(anyhow::Error::from);
        if let Err(err) = &result {
            warn!(
                "submitting request {} (sequence number {}) failed: {:#}",
                request.id, request.sequence_number, err
            );
        }
        let outcome = SubmissionOutcome {
            id: request.id,
            sequence_number: request.sequence_number,
            result,
        };
        if outcome_tx.send(outcome).await.is_err() {
            break;
        }
    }
}
