// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Pool messages
//!
//! Amounts are raw base units of the token involved: collateral amounts use the
//! collateral's decimals (e.g. 6 for USDC), token amounts use 18 decimals. Nothing
//! here rescales them. `feePercentage` is an 18-decimal fixed point number, so
//! `1e18` is 100% and `2e15` is 0.2%.
//!
//! `nonce` is the per-user counter kept by the pool. `expiration` is a unix
//! timestamp in seconds; the pool accepts the message up to and including that
//! second.

use alloy::sol;
use serde::{Deserialize, Serialize};
use synth_eip712_message::Eip712SignedMessage;

/// EIP712 signed message for MintParameters
pub type SignedMint = Eip712SignedMessage<MintParameters>;
/// EIP712 signed message for RedeemParameters
pub type SignedRedeem = Eip712SignedMessage<RedeemParameters>;
/// EIP712 signed message for ExchangeParameters
pub type SignedExchange = Eip712SignedMessage<ExchangeParameters>;

sol! {
    /// Authorizes `sender` to deposit `collateralAmount` and receive `numTokens`
    /// synthetic tokens from `derivativeAddr`.
    ///
    /// We use camelCase for field names to match the Ethereum ABI encoding
    #[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
    struct MintParameters {
        address sender;
        address derivativeAddr;
        uint256 collateralAmount;
        uint256 numTokens;
        uint256 feePercentage;
        uint256 nonce;
        uint256 expiration;
    }

    /// Authorizes `sender` to burn `numTokens` synthetic tokens of `derivativeAddr`
    /// against `collateralAmount`.
    #[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
    struct RedeemParameters {
        address sender;
        address derivativeAddr;
        uint256 collateralAmount;
        uint256 numTokens;
        uint256 feePercentage;
        uint256 nonce;
        uint256 expiration;
    }

    /// Authorizes `sender` to swap `numTokens` of `derivativeAddr` for
    /// `destNumTokens` of `destDerivativeAddr`, minted by `destPoolAddr`.
    /// `collateralAmount` is the collateral moved between the two pools.
    #[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
    struct ExchangeParameters {
        address sender;
        address derivativeAddr;
        address destPoolAddr;
        address destDerivativeAddr;
        uint256 numTokens;
        uint256 collateralAmount;
        uint256 destNumTokens;
        uint256 feePercentage;
        uint256 nonce;
        uint256 expiration;
    }
}
