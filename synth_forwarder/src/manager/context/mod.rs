// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

pub mod contract;
#[cfg(feature = "in_memory")]
pub mod memory;
