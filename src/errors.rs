// ABOUTME: Error types for the Paddock service
// ABOUTME: Re-exports the error taxonomy defined in paddock-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! Error types are defined in `paddock-core` and shared by every layer.

pub use paddock_core::errors::*;
