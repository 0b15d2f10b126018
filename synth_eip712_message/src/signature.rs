// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Signing a digest
//!
//! Digests are signed directly with ECDSA over secp256k1: the digest is the
//! message, there is no `personal_sign` prefix and no second hash. Signatures
//! are deterministic (RFC 6979) and always in low-s form.
//!
//! Contracts take the signature as three separate arguments, so it is handed
//! out as [`SignatureParts`] with `v` in the `27`/`28` convention.

use std::str::FromStr;

use alloy::{
    primitives::{Address, Bytes, Signature, B256, U256},
    signers::{local::PrivateKeySigner, SignerSync},
};
use serde::{Deserialize, Serialize};

use crate::Eip712Error;

/// Offset added to the recovery id to obtain the contract-side `v`.
pub const RECOVERY_ID_OFFSET: u8 = 27;

/// Recoverable ECDSA signature split the way Solidity verifiers consume it.
///
/// Serializes as `{"v": 27, "r": "0x…", "s": "0x…"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureParts {
    /// Recovery id plus 27
    pub v: u8,
    pub r: B256,
    pub s: B256,
}

impl SignatureParts {
    /// `r ‖ s ‖ v`, the 65-byte form taken by `bytes signature` arguments.
    pub fn to_bytes(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(65);
        bytes.extend_from_slice(self.r.as_slice());
        bytes.extend_from_slice(self.s.as_slice());
        bytes.push(self.v);
        bytes.into()
    }
}

impl From<Signature> for SignatureParts {
    fn from(signature: Signature) -> Self {
        Self {
            v: RECOVERY_ID_OFFSET + u8::from(signature.v()),
            r: B256::from(signature.r().to_be_bytes::<32>()),
            s: B256::from(signature.s().to_be_bytes::<32>()),
        }
    }
}

impl TryFrom<SignatureParts> for Signature {
    type Error = Eip712Error;

    fn try_from(parts: SignatureParts) -> Result<Self, Self::Error> {
        let y_parity = match parts.v {
            27 => false,
            28 => true,
            v => return Err(Eip712Error::InvalidSignatureParts { v }),
        };
        Ok(Signature::new(
            U256::from_be_bytes(parts.r.0),
            U256::from_be_bytes(parts.s.0),
            y_parity,
        ))
    }
}

/// Parses a hex encoded secp256k1 private key, with or without `0x`.
///
/// # Errors
///
/// Returns [`Eip712Error::InvalidKey`] if the input is not 32 bytes of hex or
/// is not a valid scalar. The message never contains the key itself.
pub fn signer_from_private_key(private_key: &str) -> Result<PrivateKeySigner, Eip712Error> {
    PrivateKeySigner::from_str(private_key.trim())
        .map_err(|err| Eip712Error::InvalidKey(err.to_string()))
}

/// Signs a 32-byte digest as is.
pub fn sign_digest(digest: &B256, signer: &PrivateKeySigner) -> Result<SignatureParts, Eip712Error> {
    let signature = signer.sign_hash_sync(digest)?;
    Ok(signature.into())
}

/// Recovers the address that produced `parts` over `digest`.
pub fn recover_signer_from_digest(
    digest: &B256,
    parts: SignatureParts,
) -> Result<Address, Eip712Error> {
    let signature = Signature::try_from(parts)?;
    Ok(signature.recover_address_from_prehash(digest)?)
}
