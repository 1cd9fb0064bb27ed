// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides store construction for every backend and park invariant assertions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `paddock`

use std::sync::Once;
use std::time::Duration;

use paddock::config::{PoolConfig, TransactionConfig};
use paddock::database_plugins::factory::Database;
use paddock::database_plugins::memory::MemoryDatabase;
use paddock::database_plugins::ParkDatabase;
use paddock::errors::{AppResult, ErrorCode};
use paddock::models::{CageStatus, Diet, Dinosaur, DinosaurFilter, Species};
use paddock::services::ParkService;
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Park over the in-memory fake store
pub fn memory_park() -> ParkService<MemoryDatabase> {
    init_test_logging();
    ParkService::new(MemoryDatabase::new(), TransactionConfig::default())
}

/// Park over a private `sqlite::memory:` database
pub async fn sqlite_park() -> ParkService<Database> {
    init_test_logging();
    let database = Database::new("sqlite::memory:", &PoolConfig::default())
        .await
        .expect("Failed to create in-memory SQLite store");
    ParkService::new(database, TransactionConfig::default())
}

/// File-backed `SQLite` park whose directory lives as long as the fixture
pub struct FilePark {
    pub park: ParkService<Database>,
    pub url: String,
    _dir: TempDir,
}

/// File-backed `SQLite` park, needed whenever several connections must see
/// the same data
pub async fn file_park(pool: PoolConfig, transactions: TransactionConfig) -> FilePark {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let url = format!("sqlite:{}", dir.path().join("park.db").display());
    let database = Database::new(&url, &pool)
        .await
        .expect("Failed to create file SQLite store");
    FilePark {
        park: ParkService::new(database, transactions),
        url,
        _dir: dir,
    }
}

/// Pool tuned for contention tests: several connections and a generous busy wait
pub fn contention_pool() -> PoolConfig {
    PoolConfig {
        max_connections: 8,
        busy_timeout: Duration::from_secs(10),
    }
}

/// Count successes and collect failure codes
pub fn tally<T>(results: &[AppResult<T>]) -> (usize, Vec<ErrorCode>) {
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let failures = results
        .iter()
        .filter_map(|r| r.as_ref().err().map(|e| e.code))
        .collect();
    (successes, failures)
}

/// Create a cage, prefill it with `contenders[0]`, then race one spawned add
/// per contender into it
///
/// Returns every add result and the committed occupancy afterwards.
pub async fn race_adds<D>(
    park: &ParkService<D>,
    contenders: &[Species],
    cage_capacity: u32,
    prefill: u32,
) -> (Vec<AppResult<Dinosaur>>, u32)
where
    D: ParkDatabase + 'static,
{
    let cage = park
        .add_cage(cage_capacity, CageStatus::Active)
        .await
        .expect("create race cage");
    for _ in 0..prefill {
        park.add_dinosaur("Resident", contenders[0], cage.id)
            .await
            .expect("prefill race cage");
    }

    let handles: Vec<_> = contenders
        .iter()
        .enumerate()
        .map(|(i, &species)| {
            let park = park.clone();
            tokio::spawn(async move {
                park.add_dinosaur(&format!("Contender {i}"), species, cage.id)
                    .await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.expect("contender task panicked"));
    }
    let occupancy = park
        .get_cage(cage.id)
        .await
        .expect("read race cage")
        .occupancy;
    (results, occupancy)
}

/// Check every park rule against the committed state
pub async fn assert_park_invariants<D: ParkDatabase>(park: &ParkService<D>) {
    let cages = park.list_cages(None).await.expect("list cages");
    let dinosaurs = park
        .list_dinosaurs(DinosaurFilter::default())
        .await
        .expect("list dinosaurs");

    for dinosaur in &dinosaurs {
        assert!(
            cages.iter().any(|cage| cage.id == dinosaur.cage_id),
            "dinosaur {} references missing cage {}",
            dinosaur.id,
            dinosaur.cage_id
        );
    }

    for cage in &cages {
        let residents: Vec<_> = dinosaurs
            .iter()
            .filter(|dinosaur| dinosaur.cage_id == cage.id)
            .collect();

        assert_eq!(cage.occupancy as usize, residents.len(), "occupancy drift in {}", cage.id);
        assert!(cage.occupancy <= cage.capacity, "cage {} over capacity", cage.id);
        if cage.status == CageStatus::Down {
            assert_eq!(cage.occupancy, 0, "powered-down cage {} is occupied", cage.id);
        }

        if let Some(first) = residents.first() {
            assert!(
                residents.iter().all(|d| d.species.diet() == first.species.diet()),
                "mixed diets in cage {}",
                cage.id
            );
            if first.species.diet() == Diet::Carnivore {
                assert!(
                    residents.iter().all(|d| d.species == first.species),
                    "mixed carnivore species in cage {}",
                    cage.id
                );
            }
        }
    }
}

/// Let the clock advance past timestamp precision so creation order is strict
pub async fn tick() {
    tokio::time::sleep(Duration::from_millis(2)).await;
}
