// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Requests as they arrive over the wire.
//!
//! Every field is a string: addresses as hex, amounts and nonces as decimal or
//! `0x`-prefixed hex integers. Converting a request into its typed message is
//! where local validation happens, so malformed input is rejected with
//! [`MessageError::InvalidArgument`] before anything is hashed or signed.
//!
//! `feePercentage` and `expiration` are not part of a request. They are chosen
//! by whoever signs and passed in as [`SigningTerms`].

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{ExchangeParameters, MessageError, MintParameters, RedeemParameters};

/// Terms the signer adds to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningTerms {
    pub fee_percentage: U256,
    pub expiration: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub sender: String,
    pub derivative_addr: String,
    pub collateral_amount: String,
    pub num_tokens: String,
    pub nonce: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemRequest {
    pub sender: String,
    pub derivative_addr: String,
    pub collateral_amount: String,
    pub num_tokens: String,
    pub nonce: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest {
    pub sender: String,
    pub derivative_addr: String,
    pub dest_pool_addr: String,
    pub dest_derivative_addr: String,
    pub num_tokens: String,
    pub collateral_amount: String,
    pub dest_num_tokens: String,
    pub nonce: String,
}

impl TryFrom<(MintRequest, SigningTerms)> for MintParameters {
    type Error = MessageError;

    fn try_from((request, terms): (MintRequest, SigningTerms)) -> Result<Self, Self::Error> {
        Ok(MintParameters {
            sender: parse_account("sender", &request.sender)?,
            derivativeAddr: parse_account("derivativeAddr", &request.derivative_addr)?,
            collateralAmount: parse_uint("collateralAmount", &request.collateral_amount)?,
            numTokens: parse_uint("numTokens", &request.num_tokens)?,
            feePercentage: terms.fee_percentage,
            nonce: parse_uint("nonce", &request.nonce)?,
            expiration: terms.expiration,
        })
    }
}

impl TryFrom<(RedeemRequest, SigningTerms)> for RedeemParameters {
    type Error = MessageError;

    fn try_from((request, terms): (RedeemRequest, SigningTerms)) -> Result<Self, Self::Error> {
        Ok(RedeemParameters {
            sender: parse_account("sender", &request.sender)?,
            derivativeAddr: parse_account("derivativeAddr", &request.derivative_addr)?,
            collateralAmount: parse_uint("collateralAmount", &request.collateral_amount)?,
            numTokens: parse_uint("numTokens", &request.num_tokens)?,
            feePercentage: terms.fee_percentage,
            nonce: parse_uint("nonce", &request.nonce)?,
            expiration: terms.expiration,
        })
    }
}

impl TryFrom<(ExchangeRequest, SigningTerms)> for ExchangeParameters {
    type Error = MessageError;

    fn try_from((request, terms): (ExchangeRequest, SigningTerms)) -> Result<Self, Self::Error> {
        Ok(ExchangeParameters {
            sender: parse_account("sender", &request.sender)?,
            derivativeAddr: parse_account("derivativeAddr", &request.derivative_addr)?,
            destPoolAddr: parse_account("destPoolAddr", &request.dest_pool_addr)?,
            destDerivativeAddr: parse_account(
                "destDerivativeAddr",
                &request.dest_derivative_addr,
            )?,
            numTokens: parse_uint("numTokens", &request.num_tokens)?,
            collateralAmount: parse_uint("collateralAmount", &request.collateral_amount)?,
            destNumTokens: parse_uint("destNumTokens", &request.dest_num_tokens)?,
            feePercentage: terms.fee_percentage,
            nonce: parse_uint("nonce", &request.nonce)?,
            expiration: terms.expiration,
        })
    }
}

/// Parses an address that must not be the zero address.
pub fn parse_account(field: &str, value: &str) -> Result<Address, MessageError> {
    let address = parse_address(field, value)?;
    if address.is_zero() {
        return Err(MessageError::invalid_argument(field, "zero address"));
    }
    Ok(address)
}

pub fn parse_address(field: &str, value: &str) -> Result<Address, MessageError> {
    Address::from_str(value.trim()).map_err(|err| MessageError::invalid_argument(field, err))
}

/// Parses a decimal or `0x`-prefixed hex integer that fits in 256 bits.
pub fn parse_uint(field: &str, value: &str) -> Result<U256, MessageError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MessageError::invalid_argument(field, "empty value"));
    }
    U256::from_str(value).map_err(|err| MessageError::invalid_argument(field, err))
}
