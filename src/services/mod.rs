// ABOUTME: Consistency core for cage and dinosaur operations
// ABOUTME: Transaction-level rule routines plus the ParkService operation facade
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! Domain service layer
//!
//! `compatibility`, `cages` and `dinosaurs` hold the rules as free functions
//! over an open [`ParkTransaction`](crate::database_plugins::ParkTransaction).
//! [`park::ParkService`] owns the transaction lifecycle around them.

/// Placement compatibility rules
pub mod compatibility;

/// Cage aggregate access, status changes, and deletion
pub mod cages;

/// Dinosaur add and move
pub mod dinosaurs;

/// Operation facade with commit, rollback, retry, and deadlines
pub mod park;

pub use park::ParkService;

use crate::errors::AppError;
use crate::models::{CageId, DinosaurId};

pub(crate) fn cage_not_found(cage_id: CageId) -> AppError {
    AppError::not_found(format!("Cage {cage_id}")).with_resource_id(cage_id.to_string())
}

pub(crate) fn dinosaur_not_found(dinosaur_id: DinosaurId) -> AppError {
    AppError::not_found(format!("Dinosaur {dinosaur_id}")).with_resource_id(dinosaur_id.to_string())
}
