// ABOUTME: Core types and constants for the Paddock cage and dinosaur placement service
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

#![deny(unsafe_code)]

//! # Paddock Core
//!
//! Foundation crate providing the shared types of the Paddock placement service.
//! It has no knowledge of any storage engine and is designed to change
//! infrequently.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **models**: Cages, dinosaurs, species, and the placement snapshot
//! - **constants**: Domain-wide limits and labels

/// Unified error handling system with standard error codes
pub mod errors;

/// Domain models (cages, dinosaurs, species)
pub mod models;

/// Domain constants and limits
pub mod constants;
