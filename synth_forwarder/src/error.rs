// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::result::Result as StdResult;

use alloy::primitives::Address;
use synth_eip712_message::Eip712Error;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// The forwarder nonce could not be read. The read can be retried once the
    /// node is reachable again.
    #[error("Failed to fetch forwarder nonce for {from} after {attempts} attempt(s): {source_error_message}")]
    NonceFetch {
        from: Address,
        retryable: bool,
        attempts: u32,
        source_error_message: String,
    },
    #[error("Signer {signer} cannot sign a request from {from}")]
    SignerMismatch { signer: Address, from: Address },
    #[error("Forward request signature must be 65 bytes, got {len}")]
    InvalidSignatureLength { len: usize },
    #[error(transparent)]
    SignerError(#[from] alloy::signers::Error),
    #[error(transparent)]
    SignatureError(#[from] alloy::primitives::SignatureError),
    #[error(transparent)]
    Eip712Error(#[from] Eip712Error),
}

impl Error {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::NonceFetch { retryable: true, .. })
    }
}

pub type Result<T> = StdResult<T, Error>;
