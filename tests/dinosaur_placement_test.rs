// ABOUTME: Integration tests for dinosaur placement over the SQLite and in-memory stores
// ABOUTME: Exercises compatibility rules, moves, deletes, filters, and rollback of failed placements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use paddock::database_plugins::ParkDatabase;
use paddock::errors::ErrorCode;
use paddock::models::{CageId, CageStatus, DinosaurFilter, DinosaurId, Species};
use paddock::services::ParkService;

async fn carnivore_scenario<D: ParkDatabase>(park: &ParkService<D>) {
    let cage = park.add_cage(2, CageStatus::Active).await.unwrap();

    park.add_dinosaur("A", Species::Tyrannosaurus, cage.id)
        .await
        .unwrap();
    assert_eq!(park.get_cage(cage.id).await.unwrap().occupancy, 1);

    let err = park
        .add_dinosaur("B", Species::Velociraptor, cage.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SpeciesMismatch);
    assert_eq!(park.get_cage(cage.id).await.unwrap().occupancy, 1);

    park.add_dinosaur("C", Species::Tyrannosaurus, cage.id)
        .await
        .unwrap();
    assert_eq!(park.get_cage(cage.id).await.unwrap().occupancy, 2);

    let err = park
        .add_dinosaur("D", Species::Tyrannosaurus, cage.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CapacityExceeded);
    assert_eq!(park.get_cage(cage.id).await.unwrap().occupancy, 2);

    common::assert_park_invariants(park).await;
}

#[tokio::test]
async fn test_carnivore_scenario_sqlite() {
    carnivore_scenario(&common::sqlite_park().await).await;
}

#[tokio::test]
async fn test_carnivore_scenario_memory() {
    carnivore_scenario(&common::memory_park()).await;
}

#[tokio::test]
async fn test_herbivores_share_but_reject_carnivores() {
    let park = common::sqlite_park().await;
    let cage = park.add_cage(4, CageStatus::Active).await.unwrap();

    for (name, species) in [
        ("Littlefoot", Species::Brachiosaurus),
        ("Spike", Species::Stegosaurus),
        ("Cera", Species::Triceratops),
    ] {
        park.add_dinosaur(name, species, cage.id).await.unwrap();
    }

    let err = park
        .add_dinosaur("Sharptooth", Species::Tyrannosaurus, cage.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SpeciesMismatch);
    common::assert_park_invariants(&park).await;
}

#[tokio::test]
async fn test_add_to_down_cage_leaves_no_row() {
    let park = common::sqlite_park().await;
    let cage = park.add_cage(5, CageStatus::Down).await.unwrap();

    let err = park
        .add_dinosaur("Ducky", Species::Ankylosaurus, cage.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CagePoweredDown);
    assert_eq!(err.context.resource_id, Some(cage.id.to_string()));
    assert!(park
        .list_dinosaurs(DinosaurFilter::default())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_add_to_missing_cage() {
    let park = common::sqlite_park().await;
    let err = park
        .add_dinosaur("Petrie", Species::Spinosaurus, CageId::new())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_blank_name_rejected_before_store() {
    let park = common::sqlite_park().await;
    let cage = park.add_cage(1, CageStatus::Active).await.unwrap();
    let err = park
        .add_dinosaur("   ", Species::Megalosaurus, cage.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);
}

#[tokio::test]
async fn test_added_dinosaur_reads_back_identically() {
    let park = common::sqlite_park().await;
    let cage = park.add_cage(1, CageStatus::Active).await.unwrap();
    let added = park
        .add_dinosaur("Blue", Species::Velociraptor, cage.id)
        .await
        .unwrap();

    assert_eq!(added.cage_id, cage.id);
    assert_eq!(added.created_at, added.updated_at);
    assert_eq!(park.get_dinosaur(added.id).await.unwrap(), added);
}

#[tokio::test]
async fn test_move_scenarios() {
    let park = common::sqlite_park().await;
    let home = park.add_cage(3, CageStatus::Active).await.unwrap();
    let down = park.add_cage(3, CageStatus::Down).await.unwrap();
    let full = park.add_cage(1, CageStatus::Active).await.unwrap();

    let mover = park
        .add_dinosaur("Sarah", Species::Triceratops, home.id)
        .await
        .unwrap();
    park.add_dinosaur("Bumpy", Species::Ankylosaurus, full.id)
        .await
        .unwrap();

    let err = park.move_dinosaur(mover.id, down.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CagePoweredDown);

    let err = park.move_dinosaur(mover.id, full.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CapacityExceeded);

    assert_eq!(park.get_dinosaur(mover.id).await.unwrap().cage_id, home.id);
    assert_eq!(park.get_cage(home.id).await.unwrap().occupancy, 1);
    common::assert_park_invariants(&park).await;
}

#[tokio::test]
async fn test_move_frees_origin_slot() {
    let park = common::sqlite_park().await;
    let origin = park.add_cage(1, CageStatus::Active).await.unwrap();
    let target = park.add_cage(2, CageStatus::Active).await.unwrap();
    park.add_dinosaur("Delta", Species::Velociraptor, target.id)
        .await
        .unwrap();
    let blue = park
        .add_dinosaur("Blue", Species::Velociraptor, origin.id)
        .await
        .unwrap();

    let moved = park.move_dinosaur(blue.id, target.id).await.unwrap();
    assert_eq!(moved.cage_id, target.id);
    assert_eq!(moved.created_at, blue.created_at);
    assert!(moved.updated_at >= blue.updated_at);
    assert_eq!(park.get_dinosaur(blue.id).await.unwrap(), moved);

    assert_eq!(park.get_cage(origin.id).await.unwrap().occupancy, 0);
    assert_eq!(park.get_cage(target.id).await.unwrap().occupancy, 2);

    park.add_dinosaur("Echo", Species::Spinosaurus, origin.id)
        .await
        .unwrap();
    common::assert_park_invariants(&park).await;
}

#[tokio::test]
async fn test_move_carnivore_into_other_species() {
    let park = common::sqlite_park().await;
    let raptors = park.add_cage(3, CageStatus::Active).await.unwrap();
    let rexes = park.add_cage(3, CageStatus::Active).await.unwrap();
    let blue = park
        .add_dinosaur("Blue", Species::Velociraptor, raptors.id)
        .await
        .unwrap();
    park.add_dinosaur("Rexy", Species::Tyrannosaurus, rexes.id)
        .await
        .unwrap();

    let err = park.move_dinosaur(blue.id, rexes.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::SpeciesMismatch);
}

#[tokio::test]
async fn test_move_within_full_cage_is_noop() {
    let park = common::sqlite_park().await;
    let cage = park.add_cage(1, CageStatus::Active).await.unwrap();
    let rex = park
        .add_dinosaur("Rexy", Species::Tyrannosaurus, cage.id)
        .await
        .unwrap();

    assert_eq!(park.move_dinosaur(rex.id, cage.id).await.unwrap(), rex);
    assert_eq!(park.get_dinosaur(rex.id).await.unwrap(), rex);
}

#[tokio::test]
async fn test_move_missing_dinosaur_or_cage() {
    let park = common::sqlite_park().await;
    let cage = park.add_cage(1, CageStatus::Active).await.unwrap();
    let rex = park
        .add_dinosaur("Rexy", Species::Tyrannosaurus, cage.id)
        .await
        .unwrap();

    assert_eq!(
        park.move_dinosaur(DinosaurId::new(), cage.id)
            .await
            .unwrap_err()
            .code,
        ErrorCode::ResourceNotFound
    );
    assert_eq!(
        park.move_dinosaur(rex.id, CageId::new())
            .await
            .unwrap_err()
            .code,
        ErrorCode::ResourceNotFound
    );
}

#[tokio::test]
async fn test_delete_dinosaur() {
    let park = common::sqlite_park().await;
    let cage = park.add_cage(1, CageStatus::Active).await.unwrap();
    let rex = park
        .add_dinosaur("Rexy", Species::Tyrannosaurus, cage.id)
        .await
        .unwrap();

    park.delete_dinosaur(rex.id).await.unwrap();
    assert_eq!(
        park.get_dinosaur(rex.id).await.unwrap_err().code,
        ErrorCode::ResourceNotFound
    );
    assert_eq!(
        park.delete_dinosaur(rex.id).await.unwrap_err().code,
        ErrorCode::ResourceNotFound
    );
    assert_eq!(park.get_cage(cage.id).await.unwrap().occupancy, 0);
}

#[tokio::test]
async fn test_list_dinosaurs_filters() {
    let park = common::sqlite_park().await;
    let herd = park.add_cage(4, CageStatus::Active).await.unwrap();
    let pack = park.add_cage(4, CageStatus::Active).await.unwrap();

    let littlefoot = park
        .add_dinosaur("Littlefoot", Species::Brachiosaurus, herd.id)
        .await
        .unwrap();
    common::tick().await;
    let cera = park
        .add_dinosaur("Cera", Species::Triceratops, herd.id)
        .await
        .unwrap();
    common::tick().await;
    let blue = park
        .add_dinosaur("Blue", Species::Velociraptor, pack.id)
        .await
        .unwrap();

    let all = park.list_dinosaurs(DinosaurFilter::default()).await.unwrap();
    let ids: Vec<_> = all.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![littlefoot.id, cera.id, blue.id]);

    let in_herd = park
        .list_dinosaurs(DinosaurFilter::default().in_cage(herd.id))
        .await
        .unwrap();
    assert_eq!(in_herd.len(), 2);

    let raptors = park
        .list_dinosaurs(DinosaurFilter::default().of_species(Species::Velociraptor))
        .await
        .unwrap();
    assert_eq!(raptors, vec![blue]);

    let none = park
        .list_dinosaurs(
            DinosaurFilter::default()
                .in_cage(herd.id)
                .of_species(Species::Velociraptor),
        )
        .await
        .unwrap();
    assert!(none.is_empty());
}
