// ABOUTME: Domain constants shared by the store backends and the placement rules
// ABOUTME: Identifier format, name limits, and table names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

/// Identifier format constraints
pub mod ids {
    /// Only the hyphenated `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form is accepted
    pub const ID_LENGTH: usize = 36;
}

/// Dinosaur attribute limits
pub mod dinosaurs {
    /// Longest accepted dinosaur name, in characters
    pub const MAX_NAME_LENGTH: usize = 255;
}

/// Persisted table names
pub mod tables {
    /// Cage rows (capacity, status, timestamps)
    pub const CAGES: &str = "cages";
    /// Dinosaur rows (name, species, cage reference, timestamps)
    pub const DINOSAURS: &str = "dinosaurs";
}
