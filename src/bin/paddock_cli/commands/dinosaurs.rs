// ABOUTME: Dinosaur management commands for paddock-cli
// ABOUTME: Handles add, list, get, move, and delete operations for dinosaurs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use anyhow::Result;
use paddock::{
    database_plugins::factory::Database,
    models::{CageId, DinosaurFilter, DinosaurId, Species},
    services::ParkService,
};
use tracing::info;

use crate::helpers::display::{print_deleted, print_json};

/// Place a new dinosaur
pub async fn add(
    park: &ParkService<Database>,
    name: &str,
    species: Species,
    cage_id: CageId,
) -> Result<()> {
    let dinosaur = park.add_dinosaur(name, species, cage_id).await?;
    info!("Placed {} ({}) in cage {}", dinosaur.name, dinosaur.species, cage_id);
    print_json(&dinosaur)
}

/// List dinosaurs matching the given filters
pub async fn list(
    park: &ParkService<Database>,
    cage_id: Option<CageId>,
    species: Option<Species>,
) -> Result<()> {
    let filter = DinosaurFilter { cage_id, species };
    let dinosaurs = park.list_dinosaurs(filter).await?;
    info!("Found {} dinosaur(s)", dinosaurs.len());
    print_json(&dinosaurs)
}

/// Show one dinosaur
pub async fn get(park: &ParkService<Database>, dinosaur_id: DinosaurId) -> Result<()> {
    print_json(&park.get_dinosaur(dinosaur_id).await?)
}

/// Move a dinosaur into another cage
pub async fn relocate(
    park: &ParkService<Database>,
    dinosaur_id: DinosaurId,
    cage_id: CageId,
) -> Result<()> {
    print_json(&park.move_dinosaur(dinosaur_id, cage_id).await?)
}

/// Remove a dinosaur
pub async fn delete(park: &ParkService<Database>, dinosaur_id: DinosaurId) -> Result<()> {
    park.delete_dinosaur(dinosaur_id).await?;
    print_deleted("dinosaur", &dinosaur_id)
}
