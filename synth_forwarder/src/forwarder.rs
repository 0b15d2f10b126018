// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::{
    dyn_abi::Eip712Domain,
    primitives::{Address, U256},
    signers::Signer,
};

use crate::{
    forwarder_eip712_domain,
    manager::adapters::NonceReader,
    request::{sign_forward_request, MetaTxInput, SignedForwardRequest},
    Error, Result,
};

/// A deployed trusted forwarder: where it lives and how to read its nonces.
pub struct Forwarder<N> {
    address: Address,
    domain: Eip712Domain,
    nonce_reader: N,
}

impl<N: NonceReader> Forwarder<N> {
    pub fn new(chain_id: u64, address: Address, nonce_reader: N) -> Self {
        Self {
            address,
            domain: forwarder_eip712_domain(chain_id, address),
            nonce_reader,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    pub fn nonce_reader(&self) -> &N {
        &self.nonce_reader
    }

    /// One read of the current nonce, no retry.
    pub async fn nonce(&self, from: Address) -> Result<U256> {
        self.nonce_reader
            .get_nonce(from)
            .await
            .map_err(|err| Error::NonceFetch {
                from,
                retryable: true,
                attempts: 1,
                source_error_message: err.to_string(),
            })
    }
}

/// Fetches the nonce of `input.from`, builds the request and signs it.
///
/// Two calls for the same sender racing each other read the same nonce and
/// only one of the resulting requests can be executed. Use
/// [`MetaTxBuilder`](crate::manager::MetaTxBuilder) when requests for one
/// sender may be built concurrently.
pub async fn sign_meta_tx_request<S, N>(
    signer: &S,
    forwarder: &Forwarder<N>,
    input: MetaTxInput,
) -> Result<SignedForwardRequest>
where
    S: Signer + Send + Sync + ?Sized,
    N: NonceReader,
{
    let nonce = forwarder.nonce(input.from).await?;
    sign_forward_request(signer, forwarder.domain(), input.into_request(nonce)).await
}
