// ABOUTME: Re-exports command modules for paddock-cli
// ABOUTME: Provides access to cage, dinosaur, and seeding commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

pub mod cages;
pub mod dinosaurs;
pub mod seed;
