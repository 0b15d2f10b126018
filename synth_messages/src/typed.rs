// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;

use alloy::{
    dyn_abi::Eip712Domain,
    primitives::{keccak256, Address, B256, U256},
    signers::local::PrivateKeySigner,
    sol_types::SolStruct,
};
use serde::{Deserialize, Serialize};
use synth_eip712_message::{sign_digest, signing_hash, Eip712Error, SignatureParts};

use crate::{
    checks::{ExpirationCheck, NonceCheck, PreflightCheck},
    ExchangeParameters, MessageError, MintParameters, RedeemParameters,
};

/// Kind of a pool message
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum MessageKind {
    Mint,
    Redeem,
    Exchange,
}

impl MessageKind {
    /// EIP712 type string, generated from the `sol!` declaration.
    pub fn type_string(self) -> Cow<'static, str> {
        match self {
            MessageKind::Mint => MintParameters::eip712_encode_type(),
            MessageKind::Redeem => RedeemParameters::eip712_encode_type(),
            MessageKind::Exchange => ExchangeParameters::eip712_encode_type(),
        }
    }

    pub fn type_hash(self) -> B256 {
        keccak256(self.type_string().as_bytes())
    }
}

/// Any of the messages a pool verifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum TypedMessage {
    Mint(MintParameters),
    Redeem(RedeemParameters),
    Exchange(ExchangeParameters),
}

macro_rules! with_message {
    ($self:expr, $message:ident => $body:expr) => {
        match $self {
            TypedMessage::Mint($message) => $body,
            TypedMessage::Redeem($message) => $body,
            TypedMessage::Exchange($message) => $body,
        }
    };
}

impl TypedMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            TypedMessage::Mint(_) => MessageKind::Mint,
            TypedMessage::Redeem(_) => MessageKind::Redeem,
            TypedMessage::Exchange(_) => MessageKind::Exchange,
        }
    }

    pub fn type_string(&self) -> Cow<'static, str> {
        self.kind().type_string()
    }

    pub fn type_hash(&self) -> B256 {
        self.kind().type_hash()
    }

    pub fn sender(&self) -> Address {
        with_message!(self, m => m.sender)
    }

    pub fn nonce(&self) -> U256 {
        with_message!(self, m => m.nonce)
    }

    pub fn expiration(&self) -> U256 {
        with_message!(self, m => m.expiration)
    }

    pub fn struct_hash(&self) -> B256 {
        with_message!(self, m => m.eip712_hash_struct())
    }

    pub fn signing_hash(&self, domain: &Eip712Domain) -> B256 {
        let digest = with_message!(self, m => signing_hash(domain, m));
        log::debug!(
            "{} digest for {} with nonce {}: {digest}",
            self.kind(),
            self.sender(),
            self.nonce()
        );
        digest
    }

    pub fn sign(
        &self,
        domain: &Eip712Domain,
        wallet: &PrivateKeySigner,
    ) -> Result<SignatureParts, Eip712Error> {
        sign_digest(&self.signing_hash(domain), wallet)
    }

    /// Mirrors the pool's expiration and nonce checks before the message is
    /// submitted. Passing says nothing about whether the pool will accept it.
    pub fn preflight(&self, now: u64, onchain_nonce: U256) -> Result<(), MessageError> {
        ExpirationCheck::new(now).check(self)?;
        NonceCheck::new(onchain_nonce).check(self)
    }
}

impl From<MintParameters> for TypedMessage {
    fn from(message: MintParameters) -> Self {
        TypedMessage::Mint(message)
    }
}

impl From<RedeemParameters> for TypedMessage {
    fn from(message: RedeemParameters) -> Self {
        TypedMessage::Redeem(message)
    }
}

impl From<ExchangeParameters> for TypedMessage {
    fn from(message: ExchangeParameters) -> Self {
        TypedMessage::Exchange(message)
    }
}
