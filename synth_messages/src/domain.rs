// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;

use alloy::{
    dyn_abi::Eip712Domain,
    primitives::{Address, B256, U256},
};
use serde::{Deserialize, Serialize};
use synth_eip712_message::build_domain_separator;

/// `name` field of every Synthereum pool domain.
pub const POOL_DOMAIN_NAME: &str = "Synthereum Pool";

/// The EIP712 domain of a Synthereum pool.
///
/// The domain separator is defined as:
/// - `name`: "Synthereum Pool"
/// - `version`: the pool's integer version rendered in decimal, e.g. `"3"`. Not a
///   semver string.
/// - `chain_id`: The chain ID of the chain where the pool is deployed.
/// - `verifying_contract`: The address of the pool.
pub fn synthereum_pool_domain(chain_id: u64, pool: Address, pool_version: u8) -> Eip712Domain {
    Eip712Domain::new(
        Some(Cow::Borrowed(POOL_DOMAIN_NAME)),
        Some(Cow::Owned(pool_version.to_string())),
        Some(U256::from(chain_id)),
        Some(pool),
        None,
    )
}

/// Domain fields and resulting separator, as published to clients that want to
/// verify signatures themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfo {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
    pub separator: B256,
}

impl DomainInfo {
    pub fn for_pool(chain_id: u64, pool: Address, pool_version: u8) -> Self {
        let version = pool_version.to_string();
        Self {
            separator: build_domain_separator(chain_id, pool, POOL_DOMAIN_NAME, &version),
            name: POOL_DOMAIN_NAME.to_owned(),
            version,
            chain_id,
            verifying_contract: pool,
        }
    }
}
