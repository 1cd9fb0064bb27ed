// ABOUTME: Cage management commands for paddock-cli
// ABOUTME: Handles add, list, get, status, and delete operations for cages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use anyhow::Result;
use paddock::{
    database_plugins::factory::Database,
    models::{CageId, CageStatus},
    services::ParkService,
};
use tracing::info;

use crate::helpers::display::{print_deleted, print_json};

/// Create a cage
pub async fn add(park: &ParkService<Database>, capacity: u32, status: CageStatus) -> Result<()> {
    let cage = park.add_cage(capacity, status).await?;
    info!("Created cage {} (capacity {})", cage.id, cage.capacity);
    print_json(&cage)
}

/// List cages, optionally by status
pub async fn list(park: &ParkService<Database>, status: Option<CageStatus>) -> Result<()> {
    let cages = park.list_cages(status).await?;
    info!("Found {} cage(s)", cages.len());
    print_json(&cages)
}

/// Show one cage
pub async fn get(park: &ParkService<Database>, cage_id: CageId) -> Result<()> {
    print_json(&park.get_cage(cage_id).await?)
}

/// Power a cage up or down
pub async fn set_status(
    park: &ParkService<Database>,
    cage_id: CageId,
    status: CageStatus,
) -> Result<()> {
    print_json(&park.change_cage_status(cage_id, status).await?)
}

/// Delete an empty cage
pub async fn delete(park: &ParkService<Database>, cage_id: CageId) -> Result<()> {
    park.delete_cage(cage_id).await?;
    print_deleted("cage", &cage_id)
}
