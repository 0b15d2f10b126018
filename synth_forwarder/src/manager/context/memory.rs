// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory context implementation for the meta-transaction builder.
//!
//! This module provides an in-memory nonce storage standing in for the
//! forwarder contract. It is useful for testing and development purposes.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error;

use crate::manager::adapters::NonceReader;

pub type NonceStorage = Arc<RwLock<HashMap<Address, U256>>>;

#[derive(Debug, Error)]
pub enum InMemoryError {
    #[error("something went wrong: {error}")]
    AdapterError { error: String },
    #[error("nonce {nonce} for {from} does not match current nonce {current}")]
    NonceMismatch {
        from: Address,
        nonce: U256,
        current: U256,
    },
}

/// Per-sender nonces, starting at zero like the forwarder's mapping.
#[derive(Clone, Default)]
pub struct InMemoryNonceStorage {
    nonces: NonceStorage,
}

impl InMemoryNonceStorage {
    pub fn new(nonces: NonceStorage) -> Self {
        Self { nonces }
    }

    pub fn nonce(&self, from: Address) -> Result<U256, InMemoryError> {
        let nonces = self.nonces.read().map_err(|err| InMemoryError::AdapterError {
            error: err.to_string(),
        })?;
        Ok(nonces.get(&from).copied().unwrap_or(U256::ZERO))
    }

    pub fn set_nonce(&self, from: Address, nonce: U256) -> Result<(), InMemoryError> {
        let mut nonces = self.nonces.write().map_err(|err| InMemoryError::AdapterError {
            error: err.to_string(),
        })?;
        nonces.insert(from, nonce);
        Ok(())
    }

    /// Consumes the current nonce of `from` and returns the one consumed.
    pub fn increment(&self, from: Address) -> Result<U256, InMemoryError> {
        let mut nonces = self.nonces.write().map_err(|err| InMemoryError::AdapterError {
            error: err.to_string(),
        })?;
        let current = nonces.entry(from).or_insert(U256::ZERO);
        let consumed = *current;
        *current = consumed + U256::from(1);
        Ok(consumed)
    }

    /// Consumes `nonce` for `from` if it is the current one.
    ///
    /// The comparison and the increment happen under one write lock, so two
    /// callers holding the same nonce cannot both succeed.
    pub fn try_consume(&self, from: Address, nonce: U256) -> Result<(), InMemoryError> {
        let mut nonces = self.nonces.write().map_err(|err| InMemoryError::AdapterError {
            error: err.to_string(),
        })?;
        let current = nonces.entry(from).or_insert(U256::ZERO);
        if *current != nonce {
            return Err(InMemoryError::NonceMismatch {
                from,
                nonce,
                current: *current,
            });
        }
        *current = nonce + U256::from(1);
        Ok(())
    }
}

#[async_trait]
impl NonceReader for InMemoryNonceStorage {
    type AdapterError = InMemoryError;

    async fn get_nonce(&self, from: Address) -> Result<U256, Self::AdapterError> {
        self.nonce(from)
    }
}
