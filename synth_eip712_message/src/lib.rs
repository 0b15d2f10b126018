// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # EIP712 signed message
//!
//! This crate contains the building blocks used to sign Synthereum messages with the
//! EIP712 standard: the domain separator, the `0x1901` digest, and the `(v, r, s)`
//! signature handed to contracts. [`Eip712SignedMessage`] ties them together for any
//! `sol!` struct.
//!
//! # Example
//! ```rust
//! # use alloy::{dyn_abi::Eip712Domain, primitives::{Address, U256}, signers::local::PrivateKeySigner, sol};
//! # sol! { struct Ping { address sender; uint256 nonce; } }
//! # let domain_separator = Eip712Domain::default();
//! use synth_eip712_message::Eip712SignedMessage;
//! # let wallet = PrivateKeySigner::random();
//! # let wallet_address = wallet.address();
//! # let message = Ping { sender: Address::from([0x11u8; 20]), nonce: U256::ZERO };
//!
//! let signed_message = Eip712SignedMessage::new(&domain_separator, message, &wallet).unwrap();
//! let signer = signed_message.recover_signer(&domain_separator).unwrap();
//!
//! assert_eq!(signer, wallet_address);
//! ```
//!

pub mod digest;
pub mod signature;

use alloy::{
    dyn_abi::Eip712Domain,
    primitives::{Address, B256},
    signers::local::PrivateKeySigner,
    sol_types::SolStruct,
};
use serde::{Deserialize, Serialize};

pub use digest::{build_domain_separator, compose_digest, signing_hash};
pub use signature::{
    recover_signer_from_digest, sign_digest, signer_from_private_key, SignatureParts,
};

/// Errors returned by creation of messages and verify signature
#[derive(thiserror::Error, Debug)]
pub enum Eip712Error {
    /// `alloy` wallet error
    #[error(transparent)]
    WalletError(#[from] alloy::signers::Error),

    /// `alloy` signature error
    #[error(transparent)]
    SignatureError(#[from] alloy::primitives::SignatureError),

    /// Private key material could not be parsed
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("invalid signature recovery value v={v}, expected 27 or 28")]
    InvalidSignatureParts { v: u8 },

    #[error("recovered signer {recovered} does not match expected {expected}")]
    InvalidRecoveredSigner {
        recovered: Address,
        expected: Address,
    },
}

/// EIP712 signed message
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Eip712SignedMessage<M: SolStruct> {
    /// Message to be signed
    pub message: M,
    /// ECDSA signature of the eip712 digest of message
    pub signature: SignatureParts,
}

/// Unique identifier for a message
///
/// This is equal to the struct hash of a message, excluding the signature and the
/// domain. Two copies of a message signed by two different signers have the same id.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct MessageId(pub [u8; 32]);

impl<M: SolStruct> Eip712SignedMessage<M> {
    /// Creates a signed message with signed EIP712 hash of `message` using `signing_wallet`
    ///
    /// # Errors
    ///
    /// Returns [`Eip712Error::WalletError`] if could not sign using the wallet
    ///
    pub fn new(
        domain_separator: &Eip712Domain,
        message: M,
        signing_wallet: &PrivateKeySigner,
    ) -> Result<Self, Eip712Error> {
        let recovery_message_hash = signing_hash(domain_separator, &message);

        let signature = sign_digest(&recovery_message_hash, signing_wallet)?;

        Ok(Self { message, signature })
    }

    /// Digest that was signed under `domain_separator`.
    pub fn digest(&self, domain_separator: &Eip712Domain) -> B256 {
        signing_hash(domain_separator, &self.message)
    }

    /// Recovers and returns the signer of the message from the signature.
    pub fn recover_signer(&self, domain_separator: &Eip712Domain) -> Result<Address, Eip712Error> {
        recover_signer_from_digest(&self.digest(domain_separator), self.signature)
    }

    /// Checks that the message was signed by `expected_address`.
    ///
    /// # Errors
    ///
    /// Returns [`Eip712Error::InvalidRecoveredSigner`] if the recovered address from the
    /// signature is not equal to `expected_address`
    ///
    pub fn verify(
        &self,
        domain_separator: &Eip712Domain,
        expected_address: Address,
    ) -> Result<(), Eip712Error> {
        let recovered = self.recover_signer(domain_separator)?;
        if recovered != expected_address {
            return Err(Eip712Error::InvalidRecoveredSigner {
                recovered,
                expected: expected_address,
            });
        }
        Ok(())
    }

    pub fn signature_parts(&self) -> SignatureParts {
        self.signature
    }

    /// Use this as a simple key for testing
    pub fn unique_hash(&self) -> MessageId {
        MessageId(self.message.eip712_hash_struct().into())
    }
}
