// ABOUTME: Concurrency tests for placement operations racing on the same cage
// ABOUTME: File-backed SQLite with a shared pool so competing transactions really contend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use paddock::config::TransactionConfig;
use paddock::errors::ErrorCode;
use paddock::models::{CageStatus, Species};

#[tokio::test]
async fn test_two_adds_for_last_slot() {
    let fixture = common::file_park(common::contention_pool(), TransactionConfig::default()).await;

    for _ in 0..10 {
        let (results, occupancy) = common::race_adds(
            &fixture.park,
            &[Species::Stegosaurus, Species::Stegosaurus],
            3,
            2,
        )
        .await;
        let (successes, failures) = common::tally(&results);
        assert_eq!(successes, 1);
        assert_eq!(failures, vec![ErrorCode::CapacityExceeded]);
        assert_eq!(occupancy, 3);
    }
    common::assert_park_invariants(&fixture.park).await;
}

#[tokio::test]
async fn test_crowd_never_overshoots_capacity() {
    let fixture = common::file_park(common::contention_pool(), TransactionConfig::default()).await;
    let crowd = [Species::Triceratops; 16];

    let (results, occupancy) = common::race_adds(&fixture.park, &crowd, 5, 0).await;
    let (successes, failures) = common::tally(&results);
    assert_eq!(successes, 5);
    assert_eq!(failures.len(), 11);
    assert!(failures.iter().all(|code| *code == ErrorCode::CapacityExceeded));
    assert_eq!(occupancy, 5);
}

#[tokio::test]
async fn test_first_carnivore_decides_species() {
    let fixture = common::file_park(common::contention_pool(), TransactionConfig::default()).await;

    let (results, occupancy) = common::race_adds(
        &fixture.park,
        &[Species::Tyrannosaurus, Species::Velociraptor],
        4,
        0,
    )
    .await;
    let (successes, failures) = common::tally(&results);
    assert_eq!(successes, 1);
    assert_eq!(failures, vec![ErrorCode::SpeciesMismatch]);
    assert_eq!(occupancy, 1);
    common::assert_park_invariants(&fixture.park).await;
}

#[tokio::test]
async fn test_moves_compete_for_one_slot() {
    let fixture = common::file_park(common::contention_pool(), TransactionConfig::default()).await;
    let park = &fixture.park;

    let target = park.add_cage(1, CageStatus::Active).await.unwrap();
    let mut movers = Vec::new();
    for i in 0..6 {
        let origin = park.add_cage(1, CageStatus::Active).await.unwrap();
        movers.push(
            park.add_dinosaur(&format!("Mover {i}"), Species::Brachiosaurus, origin.id)
                .await
                .unwrap(),
        );
    }

    let handles: Vec<_> = movers
        .iter()
        .map(|dinosaur| {
            let park = park.clone();
            let id = dinosaur.id;
            tokio::spawn(async move { park.move_dinosaur(id, target.id).await })
        })
        .collect();
    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    let (successes, failures) = common::tally(&results);
    assert_eq!(successes, 1);
    assert!(failures.iter().all(|code| *code == ErrorCode::CapacityExceeded));
    assert_eq!(park.get_cage(target.id).await.unwrap().occupancy, 1);
    common::assert_park_invariants(park).await;
}

#[tokio::test]
async fn test_power_down_races_with_add() {
    let fixture = common::file_park(common::contention_pool(), TransactionConfig::default()).await;

    for _ in 0..10 {
        let cage = fixture.park.add_cage(2, CageStatus::Active).await.unwrap();

        let powering = {
            let park = fixture.park.clone();
            tokio::spawn(async move { park.change_cage_status(cage.id, CageStatus::Down).await })
        };
        let placing = {
            let park = fixture.park.clone();
            tokio::spawn(async move {
                park.add_dinosaur("Ducky", Species::Ankylosaurus, cage.id)
                    .await
            })
        };
        let powered = powering.await.unwrap();
        let placed = placing.await.unwrap();

        let cage = fixture.park.get_cage(cage.id).await.unwrap();
        match (powered, placed) {
            (Ok(down), Err(e)) => {
                assert_eq!(down.status, CageStatus::Down);
                assert_eq!(e.code, ErrorCode::CagePoweredDown);
                assert_eq!(cage.occupancy, 0);
            }
            (Err(e), Ok(_)) => {
                assert_eq!(e.code, ErrorCode::OccupancyConflict);
                assert_eq!(cage.status, CageStatus::Active);
                assert_eq!(cage.occupancy, 1);
            }
            (powered, placed) => panic!("unexpected outcome: {powered:?} / {placed:?}"),
        }
    }
    common::assert_park_invariants(&fixture.park).await;
}

#[tokio::test]
async fn test_memory_store_serializes_racing_adds() {
    let park = common::memory_park();
    let (results, occupancy) = common::race_adds(&park, &[Species::Megalosaurus; 8], 3, 0).await;
    let (successes, failures) = common::tally(&results);
    assert_eq!(successes, 3);
    assert!(failures.iter().all(|code| *code == ErrorCode::CapacityExceeded));
    assert_eq!(occupancy, 3);
}
