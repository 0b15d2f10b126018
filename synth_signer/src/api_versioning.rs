// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{self, IntoEnumIterator};

/// The versions of the signer JSON-RPC API implemented by this server.
/// They are independent of the crate version, so the message types can evolve
/// without breaking clients of the JSON-RPC API (or vice versa).
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::VariantNames,
    strum::EnumIter,
)]
pub enum SignerRpcApiVersion {
    #[strum(serialize = "0.0")]
    V0_0,
}

// serde would serialize the variant names ("V0_0"); clients send and expect
// the strum strings ("0.0").

impl Serialize for SignerRpcApiVersion {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

impl<'de> Deserialize<'de> for SignerRpcApiVersion {
    fn deserialize<D>(deserializer: D) -> std::result::Result<SignerRpcApiVersion, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SignerRpcApiVersion::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Versions that still work but answer with a deprecation warning.
/// NOTE: Make sure to test it when that list becomes non-empty.
pub static SIGNER_RPC_API_VERSIONS_DEPRECATED: &[SignerRpcApiVersion] = &[];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SignerRpcApiVersionsInfo {
    pub versions_supported: Vec<SignerRpcApiVersion>,
    pub versions_deprecated: Vec<SignerRpcApiVersion>,
}

pub fn signer_rpc_api_versions_info() -> SignerRpcApiVersionsInfo {
    SignerRpcApiVersionsInfo {
        versions_supported: SignerRpcApiVersion::iter().collect(),
        versions_deprecated: SIGNER_RPC_API_VERSIONS_DEPRECATED.to_vec(),
    }
}
