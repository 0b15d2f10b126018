// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

/// Reads the forwarder's current nonce for a sender
///
/// # Example
///
/// For example code see [crate::manager::context::memory::InMemoryNonceStorage]
#[async_trait]
pub trait NonceReader: Send + Sync {
    /// Defines the user-specified error type.
    ///
    /// This error type should implement the `Error` and `Debug` traits from
    /// the standard library.
    /// Errors of this type are returned to the user when an operation fails.
    type AdapterError: std::error::Error + std::fmt::Debug + Send + Sync + 'static;

    /// Nonce the forwarder will accept next from `from`.
    async fn get_nonce(&self, from: Address) -> Result<U256, Self::AdapterError>;
}

#[async_trait]
impl<T: NonceReader + ?Sized> NonceReader for std::sync::Arc<T> {
    type AdapterError = T::AdapterError;

    async fn get_nonce(&self, from: Address) -> Result<U256, Self::AdapterError> {
        (**self).get_nonce(from).await
    }
}
