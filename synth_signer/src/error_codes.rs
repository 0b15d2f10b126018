// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

/// JSON-RPC error codes specific to the signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonRpcErrorCode {
    /// -32001 -- Invalid API version.
    InvalidVersion = -32001,
    /// -32003 -- A request field failed validation.
    InvalidArgument = -32003,
    /// -32004 -- The validator key could not sign.
    Signing = -32004,
}

/// JSON-RPC warning codes
/// These are not part of the JSON-RPC spec, but are used to provide additional information to the
/// client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonRpcWarningCode {
    /// -32101 -- Requested API version is deprecated.
    DeprecatedVersion = -32101,
}
