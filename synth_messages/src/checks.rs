// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Pre-flight checks
//!
//! Client-side copies of the checks a pool performs before executing a signed
//! message. They let a caller skip submitting a transaction that is bound to
//! revert, but they are advisory: the pool's own nonce and block time decide.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! # use alloy::primitives::{Address, U256};
//! use synth_messages::{
//!     checks::{CheckList, ExpirationCheck, MessageCheck, NonceCheck},
//!     MintParameters, TypedMessage,
//! };
//! # let mint = MintParameters {
//! #     sender: Address::from([0x11u8; 20]),
//! #     derivativeAddr: Address::from([0x22u8; 20]),
//! #     collateralAmount: U256::from(120_000_000u64),
//! #     numTokens: U256::from(99_800_000_000_000_000_000u128),
//! #     feePercentage: U256::from(2_000_000_000_000_000u64),
//! #     nonce: U256::ZERO,
//! #     expiration: U256::from(1_700_000_000u64),
//! # };
//!
//! let checks = CheckList::new(vec![
//!     Arc::new(ExpirationCheck::new(1_700_000_000)) as MessageCheck,
//!     Arc::new(NonceCheck::new(U256::ZERO)),
//! ]);
//! assert!(checks.check_all(&TypedMessage::from(mint)).is_ok());
//! ```

use std::{
    ops::Deref,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use alloy::primitives::U256;

use crate::{MessageError, TypedMessage};

/// A check that can reject a message before it is submitted.
pub trait PreflightCheck {
    fn check(&self, message: &TypedMessage) -> Result<(), MessageError>;
}

/// Shared handle to a check
pub type MessageCheck = Arc<dyn PreflightCheck + Send + Sync>;

/// CheckList is a NewType pattern to store a list of checks.
pub struct CheckList(Arc<[MessageCheck]>);

impl CheckList {
    pub fn new(checks: Vec<MessageCheck>) -> Self {
        Self(checks.into())
    }

    pub fn empty() -> Self {
        Self(Arc::new([]))
    }

    /// Runs every check in order and returns the first failure.
    pub fn check_all(&self, message: &TypedMessage) -> Result<(), MessageError> {
        self.iter().try_for_each(|check| check.check(message))
    }
}

impl Deref for CheckList {
    type Target = [MessageCheck];

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Accepts messages whose expiration is at or after `now`.
///
/// The boundary is inclusive: a message expiring at `t` is valid at `t` and
/// rejected at `t + 1`, matching the pool's `block.timestamp <= expiration`.
#[derive(Debug, Clone, Copy)]
pub struct ExpirationCheck {
    now: u64,
}

impl ExpirationCheck {
    pub fn new(now: u64) -> Self {
        Self { now }
    }

    /// Uses the local clock. Block time can lag or lead it by a few seconds.
    pub fn at_current_time() -> Result<Self, MessageError> {
        Ok(Self::new(now_unix_secs()?))
    }
}

impl PreflightCheck for ExpirationCheck {
    fn check(&self, message: &TypedMessage) -> Result<(), MessageError> {
        let expiration = message.expiration();
        if U256::from(self.now) <= expiration {
            Ok(())
        } else {
            Err(MessageError::Expired {
                expiration,
                now: self.now,
            })
        }
    }
}

/// Accepts messages that carry the nonce the pool currently expects.
#[derive(Debug, Clone, Copy)]
pub struct NonceCheck {
    expected_nonce: U256,
}

impl NonceCheck {
    pub fn new(expected_nonce: U256) -> Self {
        Self { expected_nonce }
    }
}

impl PreflightCheck for NonceCheck {
    fn check(&self, message: &TypedMessage) -> Result<(), MessageError> {
        let message_nonce = message.nonce();
        if message_nonce == self.expected_nonce {
            Ok(())
        } else {
            Err(MessageError::NonceMismatch {
                message_nonce,
                expected_nonce: self.expected_nonce,
            })
        }
    }
}

/// Seconds since the unix epoch on the local clock.
pub fn now_unix_secs() -> Result<u64, MessageError> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| MessageError::InvalidSystemTime {
            source_error_message: err.to_string(),
        })?
        .as_secs())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::Address;
    use rstest::*;

    use super::*;
    use crate::RedeemParameters;

    const EXPIRATION: u64 = 1_700_000_000;

    #[fixture]
    fn redeem() -> TypedMessage {
        RedeemParameters {
            sender: Address::from([0x11u8; 20]),
            derivativeAddr: Address::from([0x22u8; 20]),
            collateralAmount: U256::from(120_000_000u64),
            numTokens: U256::from(99_800_000_000_000_000_000u128),
            feePercentage: U256::from(2_000_000_000_000_000u64),
            nonce: U256::from(4),
            expiration: U256::from(EXPIRATION),
        }
        .into()
    }

    #[rstest]
    #[case::well_before(EXPIRATION - 3600, true)]
    #[case::one_second_before(EXPIRATION - 1, true)]
    #[case::exact_second(EXPIRATION, true)]
    #[case::one_second_after(EXPIRATION + 1, false)]
    fn expiration_boundary_is_inclusive(
        redeem: TypedMessage,
        #[case] now: u64,
        #[case] valid: bool,
    ) {
        let result = ExpirationCheck::new(now).check(&redeem);
        assert_eq!(result.is_ok(), valid);
        if !valid {
            assert_eq!(
                result.unwrap_err(),
                MessageError::Expired {
                    expiration: U256::from(EXPIRATION),
                    now
                }
            );
        }
    }

    #[rstest]
    #[case::behind(3)]
    #[case::ahead(5)]
    fn nonce_must_match(redeem: TypedMessage, #[case] onchain: u64) {
        assert!(matches!(
            NonceCheck::new(U256::from(onchain)).check(&redeem),
            Err(MessageError::NonceMismatch { .. })
        ));
        assert!(NonceCheck::new(U256::from(4)).check(&redeem).is_ok());
    }

    #[rstest]
    fn check_list_reports_first_failure(redeem: TypedMessage) {
        let checks = CheckList::new(vec![
            Arc::new(ExpirationCheck::new(EXPIRATION + 1)) as MessageCheck,
            Arc::new(NonceCheck::new(U256::from(9))),
        ]);
        assert!(matches!(
            checks.check_all(&redeem),
            Err(MessageError::Expired { .. })
        ));
        assert!(CheckList::empty().check_all(&redeem).is_ok());
    }

    #[rstest]
    fn preflight_combines_checks(redeem: TypedMessage) {
        assert!(redeem.preflight(EXPIRATION, U256::from(4)).is_ok());
        assert!(redeem.preflight(EXPIRATION, U256::from(5)).is_err());
        assert!(redeem.preflight(EXPIRATION + 1, U256::from(4)).is_err());
    }

    #[test]
    fn local_clock_is_past_golden_expiration() {
        assert!(now_unix_secs().unwrap() > EXPIRATION);
    }
}
