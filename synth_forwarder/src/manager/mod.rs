// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! The `manager` module builds signed forward requests for many senders at
//! once.
//!
//! The [`MetaTxBuilder`] owns a [`Forwarder`](crate::Forwarder) and a
//! [`NonceReader`](adapters::NonceReader) adapter (see [adapters]). It
//! serializes nonce issuance per sender, retries nonce reads that fail, and
//! keeps track of the nonces it already handed out so pipelined requests do
//! not collide.

pub mod adapters;
mod builder;
pub mod context;

pub use builder::{MetaTxBuilder, RetryPolicy};
