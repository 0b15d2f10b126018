// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests live under `tests/`. They run the signer service against
//! in-process stand-ins for a Synthereum pool and a trusted forwarder.
