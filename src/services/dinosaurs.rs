// ABOUTME: Dinosaur placement routines executed inside one store transaction
// ABOUTME: Add into a compatible cage and move between cages, both gated by the compatibility checker
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use tracing::{debug, info};

use super::compatibility::check_cage_compatibility;
use super::dinosaur_not_found;
use crate::database_plugins::shared::timestamps;
use crate::database_plugins::ParkTransaction;
use crate::errors::AppResult;
use crate::models::{CageId, Dinosaur, DinosaurId, NewDinosaur};

/// Place a new dinosaur into its requested cage
///
/// # Errors
///
/// `ResourceNotFound`, `CagePoweredDown`, `CapacityExceeded`,
/// `SpeciesMismatch`, or a store error
pub async fn add_dinosaur<T: ParkTransaction>(tx: &mut T, request: &NewDinosaur) -> AppResult<Dinosaur> {
    let cage_id = request.cage_id();
    tx.lock_cage(cage_id).await?;
    check_cage_compatibility(tx, cage_id, request.species()).await?;

    let now = timestamps::now();
    let dinosaur = Dinosaur {
        id: DinosaurId::new(),
        name: request.name().to_owned(),
        species: request.species(),
        cage_id,
        created_at: now,
        updated_at: now,
    };
    tx.insert_dinosaur(&dinosaur).await?;

    info!(
        dinosaur_id = %dinosaur.id,
        cage_id = %cage_id,
        species = %dinosaur.species,
        "Dinosaur placed"
    );
    Ok(dinosaur)
}

/// Reassign a dinosaur to another cage
///
/// The destination is checked against the dinosaur's own species. The origin
/// cage keeps counting the dinosaur until commit. Moving into the cage the
/// dinosaur already lives in returns it unchanged without running the
/// checker.
///
/// # Errors
///
/// `ResourceNotFound` for the dinosaur or the cage, `CagePoweredDown`,
/// `CapacityExceeded`, `SpeciesMismatch`, or a store error
pub async fn move_dinosaur<T: ParkTransaction>(
    tx: &mut T,
    dinosaur_id: DinosaurId,
    cage_id: CageId,
) -> AppResult<Dinosaur> {
    tx.lock_cage(cage_id).await?;
    let dinosaur = tx
        .lock_dinosaur(dinosaur_id)
        .await?
        .ok_or_else(|| dinosaur_not_found(dinosaur_id))?;

    if dinosaur.cage_id == cage_id {
        debug!(dinosaur_id = %dinosaur_id, cage_id = %cage_id, "Dinosaur already in destination cage");
        return Ok(dinosaur);
    }

    check_cage_compatibility(tx, cage_id, dinosaur.species).await?;

    let updated_at = timestamps::now();
    if tx.update_dinosaur_cage(dinosaur_id, cage_id, updated_at).await? == 0 {
        return Err(dinosaur_not_found(dinosaur_id));
    }

    info!(
        dinosaur_id = %dinosaur_id,
        from = %dinosaur.cage_id,
        to = %cage_id,
        "Dinosaur moved"
    );
    Ok(Dinosaur {
        cage_id,
        updated_at,
        ..dinosaur
    })
}
