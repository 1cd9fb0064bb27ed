// ABOUTME: Domain models for cages and dinosaurs
// ABOUTME: Re-exports the types defined in paddock-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! Domain models are defined in `paddock-core` so the store layer and any
//! future front end share one set of types.

pub use paddock_core::models::*;
