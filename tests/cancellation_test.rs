// ABOUTME: Tests for operation deadlines, dropped futures, and retry after lock contention
// ABOUTME: A second SQLite connection holds the write lock to stall park operations mid-flight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use paddock::config::{PoolConfig, TransactionConfig};
use paddock::database_plugins::{ParkDatabase, ParkTransaction};
use paddock::errors::ErrorCode;
use paddock::models::{CageStatus, Dinosaur, DinosaurFilter, DinosaurId, Species};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

async fn blocker_pool(url: &str) -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await
        .expect("Failed to open blocker connection")
}

/// Take the database write lock from outside the park
async fn hold_write_lock(pool: &SqlitePool) -> Transaction<'static, Sqlite> {
    let mut tx = pool.begin().await.unwrap();
    sqlx::query("UPDATE cages SET capacity = capacity")
        .execute(&mut *tx)
        .await
        .unwrap();
    tx
}

#[tokio::test]
async fn test_deadline_rolls_back_stalled_add() {
    let fixture = common::file_park(common::contention_pool(), TransactionConfig::default()).await;
    let park = &fixture.park;
    let cage = park.add_cage(2, CageStatus::Active).await.unwrap();

    let blocker = blocker_pool(&fixture.url).await;
    let lock = hold_write_lock(&blocker).await;

    let err = park
        .with_timeout(Duration::from_millis(100))
        .add_dinosaur("Stalled", Species::Stegosaurus, cage.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::OperationTimeout);

    lock.rollback().await.unwrap();

    assert_eq!(park.get_cage(cage.id).await.unwrap().occupancy, 0);
    assert!(park
        .list_dinosaurs(DinosaurFilter::default())
        .await
        .unwrap()
        .is_empty());

    // The pool recovered the cancelled connection
    park.add_dinosaur("Prompt", Species::Stegosaurus, cage.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dropped_future_changes_nothing() {
    let fixture = common::file_park(common::contention_pool(), TransactionConfig::default()).await;
    let park = &fixture.park;
    let cage = park.add_cage(1, CageStatus::Active).await.unwrap();

    let blocker = blocker_pool(&fixture.url).await;
    let lock = hold_write_lock(&blocker).await;

    let abandoned = tokio::time::timeout(
        Duration::from_millis(50),
        park.change_cage_status(cage.id, CageStatus::Down),
    )
    .await;
    assert!(abandoned.is_err());

    lock.rollback().await.unwrap();
    assert_eq!(park.get_cage(cage.id).await.unwrap().status, CageStatus::Active);
}

#[tokio::test]
async fn test_retry_outlasts_short_busy_timeout() {
    let pool = PoolConfig {
        max_connections: 4,
        busy_timeout: Duration::from_millis(20),
    };
    let transactions = TransactionConfig {
        max_retries: 10,
        operation_timeout: None,
    };
    let fixture = common::file_park(pool, transactions).await;
    let park = &fixture.park;
    let cage = park.add_cage(1, CageStatus::Active).await.unwrap();

    let blocker = blocker_pool(&fixture.url).await;
    let lock = hold_write_lock(&blocker).await;
    let release = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        lock.rollback().await.unwrap();
    });

    let placed = park
        .add_dinosaur("Patient", Species::Velociraptor, cage.id)
        .await
        .unwrap();
    release.await.unwrap();

    assert_eq!(park.get_dinosaur(placed.id).await.unwrap(), placed);
}

#[tokio::test]
async fn test_store_busy_without_retries_is_database_error() {
    let pool = PoolConfig {
        max_connections: 4,
        busy_timeout: Duration::from_millis(10),
    };
    let transactions = TransactionConfig {
        max_retries: 1,
        operation_timeout: None,
    };
    let fixture = common::file_park(pool, transactions).await;
    let park = &fixture.park;
    let cage = park.add_cage(1, CageStatus::Active).await.unwrap();

    let blocker = blocker_pool(&fixture.url).await;
    let lock = hold_write_lock(&blocker).await;

    let err = park
        .add_dinosaur("Unlucky", Species::Velociraptor, cage.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);
    assert!(err.is_store_error());

    lock.rollback().await.unwrap();
    assert_eq!(park.get_cage(cage.id).await.unwrap().occupancy, 0);
}

#[tokio::test]
async fn test_dropped_transaction_discards_writes() {
    let park = common::sqlite_park().await;
    let cage = park.add_cage(1, CageStatus::Active).await.unwrap();
    let now = chrono::Utc::now();
    let ghost = Dinosaur {
        id: DinosaurId::new(),
        name: "Ghost".into(),
        species: Species::Brachiosaurus,
        cage_id: cage.id,
        created_at: now,
        updated_at: now,
    };

    {
        let mut tx = park.database().begin().await.unwrap();
        tx.insert_dinosaur(&ghost).await.unwrap();
        assert_eq!(tx.cage_aggregate(cage.id).await.unwrap().unwrap().occupancy, 1);
    }

    assert!(park.database().get_dinosaur(ghost.id).await.unwrap().is_none());
    assert_eq!(park.get_cage(cage.id).await.unwrap().occupancy, 0);
}
