// ABOUTME: In-memory park store honoring the same transactional contract as the SQL backends
// ABOUTME: Exclusive-lock transactions over a scratch copy that is swapped in on commit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! In-memory implementation of [`ParkDatabase`]
//!
//! A transaction owns the state mutex for its whole lifetime, which
//! serializes transactions completely. Writes go to a private copy of the
//! state; commit swaps the copy in, rollback or drop discards it. Foreign
//! key and check rules of the SQL schema are enforced as store errors.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use super::{ParkDatabase, ParkTransaction};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Cage, CageId, CageStatus, Dinosaur, DinosaurFilter, DinosaurId, PlacementSnapshot,
};

#[derive(Debug, Clone)]
struct CageRow {
    capacity: u32,
    status: CageStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct ParkState {
    cages: BTreeMap<CageId, CageRow>,
    dinosaurs: BTreeMap<DinosaurId, Dinosaur>,
}

impl ParkState {
    fn residents(&self, cage_id: CageId) -> impl Iterator<Item = &Dinosaur> {
        self.dinosaurs
            .values()
            .filter(move |dinosaur| dinosaur.cage_id == cage_id)
    }

    fn occupancy(&self, cage_id: CageId) -> u32 {
        self.residents(cage_id).count() as u32
    }

    fn cage(&self, cage_id: CageId) -> Option<Cage> {
        self.cages.get(&cage_id).map(|row| Cage {
            id: cage_id,
            capacity: row.capacity,
            status: row.status,
            occupancy: self.occupancy(cage_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn snapshot(&self, cage_id: CageId) -> Option<PlacementSnapshot> {
        self.cages.get(&cage_id).map(|row| PlacementSnapshot {
            cage_id,
            capacity: row.capacity,
            status: row.status,
            occupancy: self.occupancy(cage_id),
            resident_species: self.residents(cage_id).map(|d| d.species).min(),
        })
    }
}

/// In-memory database implementation
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<ParkState>>,
}

impl MemoryDatabase {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Transaction over [`MemoryDatabase`]
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<ParkState>,
    scratch: ParkState,
}

#[async_trait]
impl ParkDatabase for MemoryDatabase {
    type Transaction = MemoryTransaction;

    async fn begin(&self) -> AppResult<Self::Transaction> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let scratch = guard.clone();
        Ok(MemoryTransaction { guard, scratch })
    }

    async fn migrate(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert_cage(&self, cage: &Cage) -> AppResult<()> {
        if cage.capacity == 0 {
            return Err(AppError::database("CHECK constraint failed: capacity > 0"));
        }
        let mut state = self.state.lock().await;
        if state.cages.contains_key(&cage.id) {
            return Err(AppError::database("UNIQUE constraint failed: cages.id"));
        }
        state.cages.insert(
            cage.id,
            CageRow {
                capacity: cage.capacity,
                status: cage.status,
                created_at: cage.created_at,
                updated_at: cage.updated_at,
            },
        );
        Ok(())
    }

    async fn get_cage(&self, cage_id: CageId) -> AppResult<Option<Cage>> {
        Ok(self.state.lock().await.cage(cage_id))
    }

    async fn list_cages(&self, status: Option<CageStatus>) -> AppResult<Vec<Cage>> {
        let state = self.state.lock().await;
        let mut cages: Vec<Cage> = state
            .cages
            .keys()
            .filter_map(|id| state.cage(*id))
            .filter(|cage| status.is_none_or(|s| s == cage.status))
            .collect();
        cages.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(cages)
    }

    async fn get_dinosaur(&self, dinosaur_id: DinosaurId) -> AppResult<Option<Dinosaur>> {
        Ok(self.state.lock().await.dinosaurs.get(&dinosaur_id).cloned())
    }

    async fn list_dinosaurs(&self, filter: &DinosaurFilter) -> AppResult<Vec<Dinosaur>> {
        let state = self.state.lock().await;
        let mut dinosaurs: Vec<Dinosaur> = state
            .dinosaurs
            .values()
            .filter(|dinosaur| filter.matches(dinosaur))
            .cloned()
            .collect();
        dinosaurs.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(dinosaurs)
    }

    async fn delete_dinosaur(&self, dinosaur_id: DinosaurId) -> AppResult<u64> {
        let removed = self.state.lock().await.dinosaurs.remove(&dinosaur_id);
        Ok(u64::from(removed.is_some()))
    }
}

#[async_trait]
impl ParkTransaction for MemoryTransaction {
    async fn lock_cage(&mut self, _cage_id: CageId) -> AppResult<()> {
        // The transaction already holds the store-wide lock
        Ok(())
    }

    async fn cage_aggregate(&mut self, cage_id: CageId) -> AppResult<Option<Cage>> {
        Ok(self.scratch.cage(cage_id))
    }

    async fn placement_snapshot(&mut self, cage_id: CageId) -> AppResult<Option<PlacementSnapshot>> {
        Ok(self.scratch.snapshot(cage_id))
    }

    async fn update_cage_status(
        &mut self,
        cage_id: CageId,
        status: CageStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        Ok(self.scratch.cages.get_mut(&cage_id).map_or(0, |row| {
            row.status = status;
            row.updated_at = updated_at;
            1
        }))
    }

    async fn delete_cage(&mut self, cage_id: CageId) -> AppResult<u64> {
        if self.scratch.residents(cage_id).next().is_some() {
            return Err(AppError::database("FOREIGN KEY constraint failed"));
        }
        Ok(u64::from(self.scratch.cages.remove(&cage_id).is_some()))
    }

    async fn lock_dinosaur(&mut self, dinosaur_id: DinosaurId) -> AppResult<Option<Dinosaur>> {
        Ok(self.scratch.dinosaurs.get(&dinosaur_id).cloned())
    }

    async fn insert_dinosaur(&mut self, dinosaur: &Dinosaur) -> AppResult<()> {
        if !self.scratch.cages.contains_key(&dinosaur.cage_id) {
            return Err(AppError::database("FOREIGN KEY constraint failed"));
        }
        if self.scratch.dinosaurs.contains_key(&dinosaur.id) {
            return Err(AppError::database("UNIQUE constraint failed: dinosaurs.id"));
        }
        self.scratch.dinosaurs.insert(dinosaur.id, dinosaur.clone());
        Ok(())
    }

    async fn update_dinosaur_cage(
        &mut self,
        dinosaur_id: DinosaurId,
        cage_id: CageId,
        updated_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        if !self.scratch.cages.contains_key(&cage_id) {
            return Err(AppError::database("FOREIGN KEY constraint failed"));
        }
        Ok(self
            .scratch
            .dinosaurs
            .get_mut(&dinosaur_id)
            .map_or(0, |dinosaur| {
                dinosaur.cage_id = cage_id;
                dinosaur.updated_at = updated_at;
                1
            }))
    }

    async fn commit(mut self) -> AppResult<()> {
        *self.guard = self.scratch;
        debug!("Memory transaction committed");
        Ok(())
    }

    async fn rollback(self) -> AppResult<()> {
        debug!("Memory transaction rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database_plugins::shared::timestamps;
    use crate::models::Species;

    fn cage(capacity: u32) -> Cage {
        let now = timestamps::now();
        Cage {
            id: CageId::new(),
            capacity,
            status: CageStatus::Active,
            occupancy: 0,
            created_at: now,
            updated_at: now,
        }
    }

    fn dinosaur(species: Species, cage_id: CageId) -> Dinosaur {
        let now = timestamps::now();
        Dinosaur {
            id: DinosaurId::new(),
            name: "Test".into(),
            species,
            cage_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_discarded() {
        let db = MemoryDatabase::new();
        let cage = cage(2);
        db.insert_cage(&cage).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        tx.insert_dinosaur(&dinosaur(Species::Triceratops, cage.id))
            .await
            .unwrap();
        assert_eq!(tx.cage_aggregate(cage.id).await.unwrap().unwrap().occupancy, 1);
        drop(tx);

        assert_eq!(db.get_cage(cage.id).await.unwrap().unwrap().occupancy, 0);
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let db = MemoryDatabase::new();
        let cage = cage(2);
        db.insert_cage(&cage).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        tx.insert_dinosaur(&dinosaur(Species::Velociraptor, cage.id))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let snapshot_tx = &mut db.begin().await.unwrap();
        let snapshot = snapshot_tx.placement_snapshot(cage.id).await.unwrap().unwrap();
        assert_eq!(snapshot.occupancy, 1);
        assert_eq!(snapshot.resident_species, Some(Species::Velociraptor));
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let db = MemoryDatabase::new();
        let cage = cage(1);
        db.insert_cage(&cage).await.unwrap();

        let mut tx = db.begin().await.unwrap();
        assert!(tx
            .insert_dinosaur(&dinosaur(Species::Stegosaurus, CageId::new()))
            .await
            .is_err());
        tx.insert_dinosaur(&dinosaur(Species::Stegosaurus, cage.id))
            .await
            .unwrap();
        assert!(tx.delete_cage(cage.id).await.is_err());
        assert_eq!(tx.delete_cage(CageId::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_transactions_are_exclusive() {
        let db = MemoryDatabase::new();
        let held = db.begin().await.unwrap();

        let other = tokio::time::timeout(std::time::Duration::from_millis(20), db.begin()).await;
        assert!(other.is_err(), "second transaction should wait");

        held.rollback().await.unwrap();
        assert!(db.begin().await.is_ok());
    }
}
