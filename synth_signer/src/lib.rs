// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

pub mod api_versioning;
pub mod error_codes;
pub mod jsonrpsee_helpers;
pub mod metrics;
pub mod pool_signer;
pub mod server;
