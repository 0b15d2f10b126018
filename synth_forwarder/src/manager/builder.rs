// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{collections::HashMap, sync::Arc, time::Duration};

use alloy::{
    primitives::{Address, U256},
    signers::Signer,
};
use tokio::sync::Mutex;

use crate::{
    manager::adapters::NonceReader,
    request::{sign_forward_request, MetaTxInput, SignedForwardRequest},
    Error, Forwarder, Result,
};

/// How often and how patiently a failed nonce read is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total reads, including the first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Wait before the second read. Grows linearly with each attempt.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

/// Last nonce handed out for a sender, `None` until the first build.
type SenderSlot = Arc<Mutex<Option<U256>>>;

/// Builds signed forward requests, one sender at a time.
///
/// Builds for the same sender are serialized. Each one issues
/// `max(onchain_nonce, last_issued + 1)`, so requests pipelined from this
/// process carry consecutive nonces even before the first one is relayed.
/// Builds for different senders run in parallel.
///
/// Another process signing for the same sender can still take a nonce first;
/// the relayed request then reverts. Call [`MetaTxBuilder::forget`] before
/// rebuilding so the next nonce comes from the chain again.
pub struct MetaTxBuilder<N> {
    forwarder: Forwarder<N>,
    retry_policy: RetryPolicy,
    senders: Mutex<HashMap<Address, SenderSlot>>,
}

impl<N: NonceReader> MetaTxBuilder<N> {
    pub fn new(forwarder: Forwarder<N>) -> Self {
        Self::with_retry_policy(forwarder, RetryPolicy::default())
    }

    pub fn with_retry_policy(forwarder: Forwarder<N>, retry_policy: RetryPolicy) -> Self {
        Self {
            forwarder,
            retry_policy,
            senders: Mutex::new(HashMap::new()),
        }
    }

    pub fn forwarder(&self) -> &Forwarder<N> {
        &self.forwarder
    }

    pub async fn build<S>(&self, signer: &S, input: MetaTxInput) -> Result<SignedForwardRequest>
    where
        S: Signer + Send + Sync + ?Sized,
    {
        if signer.address() != input.from {
            return Err(Error::SignerMismatch {
                signer: signer.address(),
                from: input.from,
            });
        }
        let slot = self.slot(input.from).await;
        let mut last_issued = slot.lock().await;

        let onchain_nonce = self.fetch_nonce(input.from).await?;
        let nonce = match *last_issued {
            Some(last) => onchain_nonce.max(last + U256::from(1)),
            None => onchain_nonce,
        };
        log::debug!(
            "Issuing nonce {nonce} for {} (on-chain {onchain_nonce})",
            input.from
        );

        let signed =
            sign_forward_request(signer, self.forwarder.domain(), input.into_request(nonce))
                .await?;
        *last_issued = Some(nonce);
        Ok(signed)
    }

    /// Drops what this builder remembers about `sender`.
    ///
    /// The sender's entry is removed when no build holds it, so a long-running
    /// relay only keeps entries for senders it has not forgotten.
    pub async fn forget(&self, sender: Address) {
        let slot = {
            let mut senders = self.senders.lock().await;
            let Some(slot) = senders.get(&sender).cloned() else {
                return;
            };
            // Slots are only cloned under the map lock; two counts are the map's and ours.
            if Arc::strong_count(&slot) == 2 {
                senders.remove(&sender);
                return;
            }
            slot
        };
        *slot.lock().await = None;
    }

    /// Number of senders this builder holds state for.
    pub async fn tracked_senders(&self) -> usize {
        self.senders.lock().await.len()
    }

    /// Last nonce issued for `sender`, if any.
    pub async fn last_issued(&self, sender: Address) -> Option<U256> {
        let slot = self.senders.lock().await.get(&sender).cloned()?;
        let last_issued = *slot.lock().await;
        last_issued
    }

    async fn slot(&self, sender: Address) -> SenderSlot {
        self.senders
            .lock()
            .await
            .entry(sender)
            .or_default()
            .clone()
    }

    async fn fetch_nonce(&self, from: Address) -> Result<U256> {
        let max_attempts = self.retry_policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.forwarder.nonce_reader().get_nonce(from).await {
                Ok(nonce) => return Ok(nonce),
                Err(err) if attempt < max_attempts => {
                    log::warn!(
                        "Nonce read for {from} failed (attempt {attempt}/{max_attempts}): {err}"
                    );
                    tokio::time::sleep(self.retry_policy.backoff * attempt).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(Error::NonceFetch {
                        from,
                        retryable: true,
                        attempts: attempt,
                        source_error_message: err.to_string(),
                    })
                }
            }
        }
    }
}
