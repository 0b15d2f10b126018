// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Forward requests
//!
//! A [`ForwardRequest`] asks the trusted forwarder to call `to` with `data` on
//! behalf of `from`. The pool sees `from` as the message sender, so the user
//! only pays for the signature and the relayer pays for gas.
//!
//! `data` is dynamic, so it is hashed into the struct hash rather than
//! inlined. Use [`synth_messages::calls`] (or any ABI encoder) to produce it.

use alloy::{
    dyn_abi::Eip712Domain,
    primitives::{Address, Bytes, B256, U256},
    signers::Signer,
    sol,
    sol_types::SolCall,
};
use serde::{Deserialize, Serialize};
use synth_eip712_message::{recover_signer_from_digest, signing_hash, SignatureParts};

use crate::{Error, Result};

pub use IForwarder::ForwardRequest;

/// Gas limit put in a request when the caller does not provide one.
pub const DEFAULT_GAS_LIMIT: u64 = 1_000_000;

sol! {
    #[sol(rpc)]
    interface IForwarder {
        #[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
        struct ForwardRequest {
            address from;
            address to;
            uint256 value;
            uint256 gas;
            uint256 nonce;
            bytes data;
        }

        function getNonce(address from) external view returns (uint256);

        function verify(ForwardRequest calldata req, bytes calldata signature)
            external
            view
            returns (bool);

        function execute(ForwardRequest calldata req, bytes calldata signature)
            external
            payable
            returns (bool success, bytes memory returndata);
    }
}

/// What the caller wants relayed. The nonce is filled in when the request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTxInput {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas: Option<U256>,
}

impl MetaTxInput {
    pub fn new(from: Address, to: Address, data: Bytes) -> Self {
        Self {
            from,
            to,
            data,
            value: U256::ZERO,
            gas: None,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_gas(mut self, gas: U256) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn into_request(self, nonce: U256) -> ForwardRequest {
        ForwardRequest {
            from: self.from,
            to: self.to,
            value: self.value,
            gas: self.gas.unwrap_or(U256::from(DEFAULT_GAS_LIMIT)),
            nonce,
            data: self.data,
        }
    }
}

/// A forward request and the 65-byte `r ‖ s ‖ v` signature the forwarder expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedForwardRequest {
    pub request: ForwardRequest,
    pub signature: Bytes,
}

impl SignedForwardRequest {
    pub fn digest(&self, domain: &Eip712Domain) -> B256 {
        signing_hash(domain, &self.request)
    }

    pub fn signature_parts(&self) -> Result<SignatureParts> {
        if self.signature.len() != 65 {
            return Err(Error::InvalidSignatureLength {
                len: self.signature.len(),
            });
        }
        Ok(SignatureParts {
            r: B256::from_slice(&self.signature[..32]),
            s: B256::from_slice(&self.signature[32..64]),
            v: self.signature[64],
        })
    }

    pub fn recover_signer(&self, domain: &Eip712Domain) -> Result<Address> {
        Ok(recover_signer_from_digest(
            &self.digest(domain),
            self.signature_parts()?,
        )?)
    }

    /// Call data for `execute(req, signature)` on the forwarder.
    pub fn execute_call(&self) -> Bytes {
        IForwarder::executeCall {
            req: self.request.clone(),
            signature: self.signature.clone(),
        }
        .abi_encode()
        .into()
    }

    /// Call data for the forwarder's read-only `verify(req, signature)`.
    pub fn verify_call(&self) -> Bytes {
        IForwarder::verifyCall {
            req: self.request.clone(),
            signature: self.signature.clone(),
        }
        .abi_encode()
        .into()
    }
}

/// Signs an already built request.
///
/// The signer must be `request.from`; the forwarder would reject anything else.
pub async fn sign_forward_request<S>(
    signer: &S,
    domain: &Eip712Domain,
    request: ForwardRequest,
) -> Result<SignedForwardRequest>
where
    S: Signer + Send + Sync + ?Sized,
{
    if signer.address() != request.from {
        return Err(Error::SignerMismatch {
            signer: signer.address(),
            from: request.from,
        });
    }
    let digest = signing_hash(domain, &request);
    let signature = signer.sign_hash(&digest).await?;
    log::debug!(
        "Signed forward request from {} with nonce {}",
        request.from,
        request.nonce
    );
    Ok(SignedForwardRequest {
        request,
        signature: SignatureParts::from(signature).to_bytes(),
    })
}
