// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Context adapters for the meta-transaction builder.
//!
//! The builder never talks to a node directly. Where a nonce comes from is
//! decided by the [`NonceReader`] handed to it, so the same builder works
//! against a live forwarder, a fork, or an in-memory test double.

mod nonce;

pub use nonce::NonceReader;
