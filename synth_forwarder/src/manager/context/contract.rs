// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Nonce reader backed by the deployed forwarder.

use alloy::{
    network::Network,
    primitives::{Address, U256},
    providers::Provider,
};
use async_trait::async_trait;

use crate::{manager::adapters::NonceReader, request::IForwarder};

/// Calls `getNonce(address)` on the forwarder through an alloy provider.
pub struct ContractNonceReader<P, N: Network = alloy::network::Ethereum> {
    forwarder: IForwarder::IForwarderInstance<P, N>,
}

impl<P: Provider<N>, N: Network> ContractNonceReader<P, N> {
    pub fn new(forwarder: Address, provider: P) -> Self {
        Self {
            forwarder: IForwarder::new(forwarder, provider),
        }
    }

    pub fn address(&self) -> &Address {
        self.forwarder.address()
    }
}

#[async_trait]
impl<P: Provider<N>, N: Network> NonceReader for ContractNonceReader<P, N> {
    type AdapterError = alloy::contract::Error;

    async fn get_nonce(&self, from: Address) -> Result<U256, Self::AdapterError> {
        let nonce = self.forwarder.getNonce(from).call().await?;
        log::debug!("Forwarder {} nonce for {from}: {nonce}", self.address());
        Ok(nonce)
    }
}
