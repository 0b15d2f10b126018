// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use alloy::{
    dyn_abi::Eip712Domain,
    primitives::{Address, U256},
    signers::local::PrivateKeySigner,
    sol_types::SolStruct,
};
use synth_eip712_message::{Eip712Error, Eip712SignedMessage};
use synth_messages::{
    request::{ExchangeRequest, MintRequest, RedeemRequest, SigningTerms},
    synthereum_pool_domain, DomainInfo, MessageError, SignedExchange, SignedMint, SignedRedeem,
};

/// What the validator signs for: one pool on one chain, at a fixed fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerConfig {
    pub chain_id: u64,
    pub pool: Address,
    pub pool_version: u8,
    /// 18-decimal fixed point, `2e15` is 0.2%.
    pub fee_percentage: U256,
    /// Added to the signing time to obtain `expiration`.
    pub signature_ttl: Duration,
}

#[derive(thiserror::Error, Debug)]
pub enum SignerError {
    #[error(transparent)]
    InvalidRequest(#[from] MessageError),
    #[error(transparent)]
    Signing(#[from] Eip712Error),
}

/// Signs pool messages with the validator key.
pub struct PoolSigner {
    wallet: PrivateKeySigner,
    config: SignerConfig,
    domain: Eip712Domain,
}

impl PoolSigner {
    pub fn new(wallet: PrivateKeySigner, config: SignerConfig) -> Self {
        let domain = synthereum_pool_domain(config.chain_id, config.pool, config.pool_version);
        Self {
            wallet,
            config,
            domain,
        }
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn config(&self) -> &SignerConfig {
        &self.config
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    pub fn domain_info(&self) -> DomainInfo {
        DomainInfo::for_pool(
            self.config.chain_id,
            self.config.pool,
            self.config.pool_version,
        )
    }

    /// Fee and expiration for a message signed at `now` (unix seconds).
    pub fn terms_at(&self, now: u64) -> SigningTerms {
        SigningTerms {
            fee_percentage: self.config.fee_percentage,
            expiration: U256::from(now.saturating_add(self.config.signature_ttl.as_secs())),
        }
    }

    pub fn sign_mint(&self, request: MintRequest, now: u64) -> Result<SignedMint, SignerError> {
        self.sign((request, self.terms_at(now)).try_into()?)
    }

    pub fn sign_redeem(
        &self,
        request: RedeemRequest,
        now: u64,
    ) -> Result<SignedRedeem, SignerError> {
        self.sign((request, self.terms_at(now)).try_into()?)
    }

    pub fn sign_exchange(
        &self,
        request: ExchangeRequest,
        now: u64,
    ) -> Result<SignedExchange, SignerError> {
        self.sign((request, self.terms_at(now)).try_into()?)
    }

    fn sign<M: SolStruct>(&self, message: M) -> Result<Eip712SignedMessage<M>, SignerError> {
        let signed = Eip712SignedMessage::new(&self.domain, message, &self.wallet)?;
        log::debug!(
            "Signed {} digest {}",
            M::NAME,
            signed.digest(&self.domain)
        );
        Ok(signed)
    }
}
