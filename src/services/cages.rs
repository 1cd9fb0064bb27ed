// ABOUTME: Cage read-check-write routines executed inside one store transaction
// ABOUTME: Aggregate access with live occupancy, status transitions with occupancy guard, and guarded delete
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use tracing::{debug, info};

use super::cage_not_found;
use crate::database_plugins::shared::timestamps;
use crate::database_plugins::ParkTransaction;
use crate::errors::{AppError, AppResult};
use crate::models::{Cage, CageId, CageStatus};

/// Cage with the occupancy counted inside `tx`
///
/// # Errors
///
/// `ResourceNotFound` if the cage does not exist, or a store error
pub async fn get_cage_aggregate<T: ParkTransaction>(tx: &mut T, cage_id: CageId) -> AppResult<Cage> {
    tx.cage_aggregate(cage_id)
        .await?
        .ok_or_else(|| cage_not_found(cage_id))
}

/// Switch a cage between `active` and `down`
///
/// Setting the current status again is a no-op that returns the cage
/// unchanged. Powering down requires an empty cage; powering up is always
/// allowed.
///
/// # Errors
///
/// `ResourceNotFound`, `OccupancyConflict` when powering down an occupied
/// cage, or a store error
pub async fn change_status<T: ParkTransaction>(
    tx: &mut T,
    cage_id: CageId,
    status: CageStatus,
) -> AppResult<Cage> {
    tx.lock_cage(cage_id).await?;
    let cage = get_cage_aggregate(tx, cage_id).await?;

    if cage.status == status {
        debug!(cage_id = %cage_id, status = %status, "Cage already has requested status");
        return Ok(cage);
    }

    if status == CageStatus::Down && cage.occupancy > 0 {
        return Err(AppError::conflict(format!(
            "Cannot power down cage {cage_id} while it houses {} dinosaur(s)",
            cage.occupancy
        ))
        .with_resource_id(cage_id.to_string()));
    }

    let affected = tx
        .update_cage_status(cage_id, status, timestamps::now())
        .await?;
    if affected == 0 {
        return Err(cage_not_found(cage_id));
    }

    info!(cage_id = %cage_id, from = %cage.status, to = %status, "Cage status changed");
    get_cage_aggregate(tx, cage_id).await
}

/// Delete an empty cage
///
/// The affected-row count of the delete is checked as well, so a cage
/// removed by a concurrent caller after the aggregate read still reports
/// `ResourceNotFound`.
///
/// # Errors
///
/// `ResourceNotFound`, `OccupancyConflict` when dinosaurs still live in the
/// cage, or a store error
pub async fn delete_cage<T: ParkTransaction>(tx: &mut T, cage_id: CageId) -> AppResult<()> {
    tx.lock_cage(cage_id).await?;
    let cage = get_cage_aggregate(tx, cage_id).await?;

    if cage.occupancy > 0 {
        return Err(AppError::conflict(format!(
            "Cannot delete cage {cage_id} while it houses {} dinosaur(s)",
            cage.occupancy
        ))
        .with_resource_id(cage_id.to_string()));
    }

    if tx.delete_cage(cage_id).await? == 0 {
        return Err(cage_not_found(cage_id));
    }

    info!(cage_id = %cage_id, "Cage deleted");
    Ok(())
}
