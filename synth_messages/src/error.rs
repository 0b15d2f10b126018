// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::primitives::U256;

/// Error type for pool messages
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument { field: String, reason: String },
    #[error("message expired at {expiration}, current time is {now}")]
    Expired { expiration: U256, now: u64 },
    #[error("nonce mismatch: message carries {message_nonce}, verifier expects {expected_nonce}")]
    NonceMismatch {
        message_nonce: U256,
        expected_nonce: U256,
    },
    #[error("Failed to get current system time: {source_error_message}")]
    InvalidSystemTime { source_error_message: String },
}

impl MessageError {
    pub(crate) fn invalid_argument(field: &str, reason: impl ToString) -> Self {
        Self::InvalidArgument {
            field: field.to_owned(),
            reason: reason.to_string(),
        }
    }
}
