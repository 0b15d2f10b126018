// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Synthereum pool messages
//!
//! Messages a pool validator signs to authorize a mint, a redeem or an exchange
//! on behalf of a user. The pool recomputes the EIP712 digest from the submitted
//! parameters, recovers the signer, checks its nonce and the expiration, and only
//! then moves collateral.
//!
//! Each message is declared once with `sol!`, which derives both its EIP712 type
//! string and the order in which its fields are encoded. The declarations must stay
//! field-for-field identical to the deployed Solidity structs.

pub mod calls;
pub mod checks;
mod domain;
mod error;
mod pool;
pub mod request;
mod typed;

pub use domain::{synthereum_pool_domain, DomainInfo, POOL_DOMAIN_NAME};
pub use error::MessageError;
pub use pool::{
    ExchangeParameters, MintParameters, RedeemParameters, SignedExchange, SignedMint,
    SignedRedeem,
};
pub use typed::{MessageKind, TypedMessage};
