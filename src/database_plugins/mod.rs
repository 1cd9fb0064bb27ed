// ABOUTME: Database abstraction layer for the park store
// ABOUTME: Plugin architecture with SQLite, PostgreSQL, and in-memory backends behind two traits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! # Store abstraction
//!
//! [`ParkDatabase`] is the store handle the service layer is constructed
//! with. Single-statement reads and writes live on it directly; every
//! compound read-check-write sequence runs on a [`ParkTransaction`] obtained
//! from [`ParkDatabase::begin`].
//!
//! Backends store no occupancy: every aggregate read counts the dinosaur rows
//! referencing the cage at that moment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppResult;
use crate::models::{Cage, CageId, CageStatus, Dinosaur, DinosaurFilter, DinosaurId, PlacementSnapshot};

pub mod factory;
pub mod memory;
/// Transaction guard, retry policy, and column encodings shared by every backend
pub mod shared;
pub mod sqlite;

#[cfg(feature = "postgresql")]
pub mod postgres;

/// Core store trait
///
/// All backends implement this trait so the service layer can be built over
/// any of them, including the in-memory fake used by unit tests.
#[async_trait]
pub trait ParkDatabase: Send + Sync + Clone {
    /// Transaction type handed out by [`Self::begin`]
    type Transaction: ParkTransaction;

    /// Start a transaction; dropping it without commit rolls it back
    async fn begin(&self) -> AppResult<Self::Transaction>;

    /// Idempotently create the `cages` and `dinosaurs` tables
    async fn migrate(&self) -> AppResult<()>;

    // ================================
    // Cages
    // ================================

    /// Persist a new cage; `occupancy` is ignored
    async fn insert_cage(&self, cage: &Cage) -> AppResult<()>;

    /// Cage with live occupancy
    async fn get_cage(&self, cage_id: CageId) -> AppResult<Option<Cage>>;

    /// Cages with live occupancy, oldest first, optionally by status
    async fn list_cages(&self, status: Option<CageStatus>) -> AppResult<Vec<Cage>>;

    // ================================
    // Dinosaurs
    // ================================

    /// Dinosaur by id
    async fn get_dinosaur(&self, dinosaur_id: DinosaurId) -> AppResult<Option<Dinosaur>>;

    /// Dinosaurs matching every present filter, oldest first
    async fn list_dinosaurs(&self, filter: &DinosaurFilter) -> AppResult<Vec<Dinosaur>>;

    /// Delete a dinosaur, returning the affected row count
    async fn delete_dinosaur(&self, dinosaur_id: DinosaurId) -> AppResult<u64>;
}

/// Primitives available inside one store transaction
///
/// Reads observe the transaction's own writes. Nothing becomes visible to
/// other transactions before [`Self::commit`].
#[async_trait]
pub trait ParkTransaction: Send {
    /// Serialize against every other writer touching this cage
    ///
    /// Must be the first statement of a compound operation. A missing cage is
    /// not an error here; the aggregate read that follows reports it.
    async fn lock_cage(&mut self, cage_id: CageId) -> AppResult<()>;

    /// Cage row plus live resident count
    async fn cage_aggregate(&mut self, cage_id: CageId) -> AppResult<Option<Cage>>;

    /// Capacity, status, live occupancy, and one resident's species
    async fn placement_snapshot(&mut self, cage_id: CageId) -> AppResult<Option<PlacementSnapshot>>;

    /// Set status and `updated_at`, returning the affected row count
    async fn update_cage_status(
        &mut self,
        cage_id: CageId,
        status: CageStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Delete the cage row, returning the affected row count
    async fn delete_cage(&mut self, cage_id: CageId) -> AppResult<u64>;

    /// Fetch a dinosaur and lock its row until the transaction ends
    async fn lock_dinosaur(&mut self, dinosaur_id: DinosaurId) -> AppResult<Option<Dinosaur>>;

    /// Persist a new dinosaur
    async fn insert_dinosaur(&mut self, dinosaur: &Dinosaur) -> AppResult<()>;

    /// Reassign a dinosaur, returning the affected row count
    async fn update_dinosaur_cage(
        &mut self,
        dinosaur_id: DinosaurId,
        cage_id: CageId,
        updated_at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Make every write of this transaction visible atomically
    async fn commit(self) -> AppResult<()>;

    /// Discard every write of this transaction
    async fn rollback(self) -> AppResult<()>;
}
