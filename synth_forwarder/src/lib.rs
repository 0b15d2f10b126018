// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0
#![doc = include_str!("../README.md")]
//! ## Getting started
//!
//! A one-off request only needs a [`Forwarder`] and [`sign_meta_tx_request`].
//! Services that sign many requests for the same sender should go through
//! [`manager::MetaTxBuilder`], which keeps their nonces apart.
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! use alloy::{primitives::{Address, Bytes}, signers::local::PrivateKeySigner};
//! use synth_forwarder::{
//!     manager::context::memory::InMemoryNonceStorage, sign_meta_tx_request, Forwarder,
//!     MetaTxInput,
//! };
//!
//! let wallet = PrivateKeySigner::random();
//! let forwarder = Forwarder::new(1, Address::from([0x33u8; 20]), InMemoryNonceStorage::default());
//! let input = MetaTxInput::new(wallet.address(), Address::from([0x44u8; 20]), Bytes::new());
//!
//! let signed = sign_meta_tx_request(&wallet, &forwarder, input).await.unwrap();
//! assert_eq!(signed.signature.len(), 65);
//! assert_eq!(signed.recover_signer(forwarder.domain()).unwrap(), wallet.address());
//! # }
//! ```

use alloy::{dyn_abi::Eip712Domain, primitives::Address, sol_types::eip712_domain};

mod error;
mod forwarder;
pub mod manager;
pub mod request;

pub use error::{Error, Result};
pub use forwarder::{sign_meta_tx_request, Forwarder};
pub use request::{
    ForwardRequest, IForwarder, MetaTxInput, SignedForwardRequest, DEFAULT_GAS_LIMIT,
};

/// `name` of the trusted forwarder's EIP712 domain.
pub const FORWARDER_DOMAIN_NAME: &str = "MinimalForwarder";
/// `version` of the trusted forwarder's EIP712 domain.
pub const FORWARDER_DOMAIN_VERSION: &str = "0.0.1";

/// The EIP712 domain of the trusted forwarder.
///
/// The domain separator is defined as:
/// - `name`: "MinimalForwarder"
/// - `version`: "0.0.1"
/// - `chain_id`: The chain ID of the chain where the forwarder is deployed.
/// - `verifying_contract`: The address of the forwarder.
pub fn forwarder_eip712_domain(chain_id: u64, forwarder: Address) -> Eip712Domain {
    eip712_domain! {
        name: FORWARDER_DOMAIN_NAME,
        version: FORWARDER_DOMAIN_VERSION,
        chain_id: chain_id,
        verifying_contract: forwarder,
    }
}

#[cfg(test)]
mod forwarder_tests {
    use alloy::primitives::b256;
    use rstest::*;
    use synth_eip712_message::build_domain_separator;

    use super::*;

    #[test]
    fn golden_domain_separator() {
        assert_eq!(
            forwarder_eip712_domain(1, Address::from([0x33u8; 20])).separator(),
            b256!("0e9f398df8d1fbb89adcd47218c2e30b7e97c763f9fd9cbfc54eb27963d21b01")
        );
    }

    #[rstest]
    #[case::mainnet(1)]
    #[case::polygon(137)]
    #[case::gnosis(100)]
    fn matches_explicit_builder(#[case] chain_id: u64) {
        let forwarder = Address::from([0x33u8; 20]);
        assert_eq!(
            forwarder_eip712_domain(chain_id, forwarder).separator(),
            build_domain_separator(
                chain_id,
                forwarder,
                FORWARDER_DOMAIN_NAME,
                FORWARDER_DOMAIN_VERSION
            )
        );
    }
}
