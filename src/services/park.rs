// ABOUTME: ParkService facade exposing every cage and dinosaur operation
// ABOUTME: Runs each compound rule inside begin, commit or rollback with retry on lock conflicts and optional deadline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! # Park service
//!
//! [`ParkService`] is constructed with a store handle and the transaction
//! policy; it holds no other state and caches nothing.
//!
//! Every compound operation (status change, cage delete, dinosaur add and
//! move) runs as a single attempt of begin → lock cage → read → check →
//! write → commit. Any error rolls the attempt back before it is returned.
//! Attempts failing on a transient lock conflict are retried as a whole.
//!
//! ## Cancellation
//!
//! Dropping an operation future at any await point drops its open
//! transaction, which rolls it back. A deadline can be configured per service
//! ([`TransactionConfig::operation_timeout`]) or per call site with
//! [`ParkService::with_timeout`]; expiry returns `OperationTimeout` and
//! leaves the store untouched.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info_span, warn, Instrument};

use super::{cage_not_found, cages, dinosaur_not_found, dinosaurs};
use crate::config::TransactionConfig;
use crate::constants::tables;
use crate::database_plugins::shared::timestamps;
use crate::database_plugins::shared::transactions::retry_transaction;
use crate::database_plugins::{ParkDatabase, ParkTransaction};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Cage, CageId, CageStatus, Dinosaur, DinosaurFilter, DinosaurId, NewCage, NewDinosaur, Species,
};

/// Cage and dinosaur operations over an injected store
#[derive(Clone)]
pub struct ParkService<D: ParkDatabase> {
    database: D,
    config: TransactionConfig,
}

impl<D: ParkDatabase> ParkService<D> {
    /// Create a service over `database` with the given transaction policy
    #[must_use]
    pub const fn new(database: D, config: TransactionConfig) -> Self {
        Self { database, config }
    }

    /// Underlying store handle
    #[must_use]
    pub const fn database(&self) -> &D {
        &self.database
    }

    /// Transaction policy in effect
    #[must_use]
    pub const fn config(&self) -> &TransactionConfig {
        &self.config
    }

    /// Copy of this service whose operations fail with `OperationTimeout`
    /// after `limit`
    #[must_use]
    pub fn with_timeout(&self, limit: Duration) -> Self {
        Self {
            database: self.database.clone(),
            config: TransactionConfig {
                operation_timeout: Some(limit),
                ..self.config
            },
        }
    }

    // ================================
    // Cages
    // ================================

    /// Create a cage; it starts empty
    ///
    /// # Errors
    ///
    /// `InvalidInput` for zero capacity, or a store error
    pub async fn add_cage(&self, capacity: u32, status: CageStatus) -> AppResult<Cage> {
        let request = NewCage::new(capacity, status)?;
        let now = timestamps::now();
        let cage = Cage {
            id: CageId::new(),
            capacity: request.capacity(),
            status: request.status(),
            occupancy: 0,
            created_at: now,
            updated_at: now,
        };

        let database = &self.database;
        let new_cage = &cage;
        self.transact("add_cage", move || database.insert_cage(new_cage))
            .instrument(info_span!("park_operation", operation = "add_cage", table = tables::CAGES, cage_id = %cage.id))
            .await?;

        tracing::info!(cage_id = %cage.id, capacity = cage.capacity, status = %cage.status, "Cage created");
        Ok(cage)
    }

    /// Cage with live occupancy
    ///
    /// # Errors
    ///
    /// `ResourceNotFound`, or a store error
    pub async fn get_cage(&self, cage_id: CageId) -> AppResult<Cage> {
        self.with_deadline("get_cage", self.database.get_cage(cage_id))
            .await?
            .ok_or_else(|| cage_not_found(cage_id))
    }

    /// All cages with live occupancy, optionally only those with `status`
    ///
    /// # Errors
    ///
    /// Store errors only; no match is an empty list
    pub async fn list_cages(&self, status: Option<CageStatus>) -> AppResult<Vec<Cage>> {
        self.with_deadline("list_cages", self.database.list_cages(status))
            .await
    }

    /// Power a cage up or down
    ///
    /// # Errors
    ///
    /// `ResourceNotFound`, `OccupancyConflict` when powering down an occupied
    /// cage, or a store error
    pub async fn change_cage_status(&self, cage_id: CageId, status: CageStatus) -> AppResult<Cage> {
        let database = &self.database;
        self.transact("change_cage_status", move || async move {
            let mut tx = database.begin().await?;
            let result = cages::change_status(&mut tx, cage_id, status).await;
            settle(tx, result).await
        })
        .instrument(info_span!("park_operation", operation = "change_cage_status", cage_id = %cage_id, status = %status))
        .await
    }

    /// Delete an empty cage
    ///
    /// # Errors
    ///
    /// `ResourceNotFound`, `OccupancyConflict` while dinosaurs live in the
    /// cage, or a store error
    pub async fn delete_cage(&self, cage_id: CageId) -> AppResult<()> {
        let database = &self.database;
        self.transact("delete_cage", move || async move {
            let mut tx = database.begin().await?;
            let result = cages::delete_cage(&mut tx, cage_id).await;
            settle(tx, result).await
        })
        .instrument(info_span!("park_operation", operation = "delete_cage", cage_id = %cage_id))
        .await
    }

    // ================================
    // Dinosaurs
    // ================================

    /// Place a new dinosaur into `cage_id`
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a blank name, `ResourceNotFound`, `CagePoweredDown`,
    /// `CapacityExceeded`, `SpeciesMismatch`, or a store error
    pub async fn add_dinosaur(
        &self,
        name: &str,
        species: Species,
        cage_id: CageId,
    ) -> AppResult<Dinosaur> {
        let request = NewDinosaur::new(name, species, cage_id)?;
        let database = &self.database;
        let request = &request;
        self.transact("add_dinosaur", move || async move {
            let mut tx = database.begin().await?;
            let result = dinosaurs::add_dinosaur(&mut tx, request).await;
            settle(tx, result).await
        })
        .instrument(info_span!(
            "park_operation",
            operation = "add_dinosaur",
            table = tables::DINOSAURS,
            cage_id = %cage_id,
            species = %species
        ))
        .await
    }

    /// Dinosaur by id
    ///
    /// # Errors
    ///
    /// `ResourceNotFound`, or a store error
    pub async fn get_dinosaur(&self, dinosaur_id: DinosaurId) -> AppResult<Dinosaur> {
        self.with_deadline("get_dinosaur", self.database.get_dinosaur(dinosaur_id))
            .await?
            .ok_or_else(|| dinosaur_not_found(dinosaur_id))
    }

    /// Dinosaurs matching every present filter
    ///
    /// # Errors
    ///
    /// Store errors only; no match is an empty list
    pub async fn list_dinosaurs(&self, filter: DinosaurFilter) -> AppResult<Vec<Dinosaur>> {
        self.with_deadline("list_dinosaurs", async move {
            self.database.list_dinosaurs(&filter).await
        })
        .await
    }

    /// Move a dinosaur into another cage
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for the dinosaur or the cage, `CagePoweredDown`,
    /// `CapacityExceeded`, `SpeciesMismatch`, or a store error
    pub async fn move_dinosaur(&self, dinosaur_id: DinosaurId, cage_id: CageId) -> AppResult<Dinosaur> {
        let database = &self.database;
        self.transact("move_dinosaur", move || async move {
            let mut tx = database.begin().await?;
            let result = dinosaurs::move_dinosaur(&mut tx, dinosaur_id, cage_id).await;
            settle(tx, result).await
        })
        .instrument(info_span!(
            "park_operation",
            operation = "move_dinosaur",
            dinosaur_id = %dinosaur_id,
            cage_id = %cage_id
        ))
        .await
    }

    /// Remove a dinosaur, freeing its slot
    ///
    /// # Errors
    ///
    /// `ResourceNotFound`, or a store error
    pub async fn delete_dinosaur(&self, dinosaur_id: DinosaurId) -> AppResult<()> {
        let database = &self.database;
        let affected = self
            .transact("delete_dinosaur", move || database.delete_dinosaur(dinosaur_id))
            .instrument(info_span!("park_operation", operation = "delete_dinosaur", dinosaur_id = %dinosaur_id))
            .await?;
        if affected == 0 {
            return Err(dinosaur_not_found(dinosaur_id));
        }
        tracing::info!(dinosaur_id = %dinosaur_id, "Dinosaur deleted");
        Ok(())
    }

    // ================================
    // Transaction lifecycle
    // ================================

    async fn transact<T, F, Fut>(&self, operation: &'static str, f: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        self.with_deadline(operation, retry_transaction(f, self.config.max_retries))
            .await
    }

    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        future: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match self.config.operation_timeout {
            Some(limit) => timeout(limit, future).await.unwrap_or_else(|_| {
                warn!(
                    operation = operation,
                    timeout_ms = limit.as_millis(),
                    "Operation deadline elapsed; open transaction rolled back"
                );
                Err(AppError::timeout(operation, limit.as_millis()))
            }),
            None => future.await,
        }
    }
}

/// Commit on success, roll back on failure, and hand back the result
async fn settle<Tx: ParkTransaction, T>(tx: Tx, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_error) = tx.rollback().await {
                warn!(
                    error = %rollback_error,
                    "Explicit rollback failed; transaction is discarded when dropped"
                );
            }
            Err(e)
        }
    }
}
