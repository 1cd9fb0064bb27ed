// ABOUTME: Placement compatibility rules for adding or moving a dinosaur into a cage
// ABOUTME: Power, capacity, diet, and carnivore same-species checks over a transactional cage snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! Compatibility checker
//!
//! Rules, in order of precedence:
//! 1. the cage must exist (`ResourceNotFound`)
//! 2. the cage must be powered (`CagePoweredDown`), whatever its capacity
//! 3. the cage must have a free slot (`CapacityExceeded`)
//! 4. a non-empty cage only accepts the residents' diet, and a carnivore cage
//!    only the residents' exact species (`SpeciesMismatch`)
//!
//! Every accepted placement keeps all residents of a cage on one diet, and
//! carnivore residents on one species, so one resident's species describes
//! the whole cage. If mixed groups are ever allowed, the snapshot must carry
//! the full set of resident species instead.

use tracing::debug;

use super::cage_not_found;
use crate::database_plugins::ParkTransaction;
use crate::errors::{AppError, AppResult};
use crate::models::{CageId, Diet, PlacementSnapshot, Species};

/// Decide whether `candidate` may join the cage described by `snapshot`
///
/// # Errors
///
/// `CagePoweredDown`, `CapacityExceeded`, or `SpeciesMismatch`, first
/// applicable wins
pub fn check_placement(snapshot: &PlacementSnapshot, candidate: Species) -> AppResult<()> {
    let cage_id = snapshot.cage_id.to_string();

    if !snapshot.status.is_active() {
        return Err(AppError::cage_powered_down(cage_id));
    }

    if snapshot.is_full() {
        return Err(AppError::capacity_exceeded(cage_id, snapshot.capacity));
    }

    if let Some(resident) = snapshot.resident() {
        if resident.diet() != candidate.diet() {
            return Err(AppError::species_mismatch(format!(
                "{candidate} ({}) cannot share cage {cage_id} with {resident} ({})",
                candidate.diet(),
                resident.diet()
            ))
            .with_resource_id(cage_id));
        }
        if resident.diet() == Diet::Carnivore && resident != candidate {
            return Err(AppError::species_mismatch(format!(
                "Carnivore cage {cage_id} houses {resident} and only accepts the same species, not {candidate}"
            ))
            .with_resource_id(cage_id));
        }
    }

    Ok(())
}

/// Read the cage inside `tx` and apply [`check_placement`]
///
/// Returns the snapshot the decision was based on.
///
/// # Errors
///
/// `ResourceNotFound` for a missing cage, any [`check_placement`] error, or
/// a store error
pub async fn check_cage_compatibility<T: ParkTransaction>(
    tx: &mut T,
    cage_id: CageId,
    candidate: Species,
) -> AppResult<PlacementSnapshot> {
    let snapshot = tx
        .placement_snapshot(cage_id)
        .await?
        .ok_or_else(|| cage_not_found(cage_id))?;

    debug!(
        cage_id = %cage_id,
        candidate = %candidate,
        capacity = snapshot.capacity,
        occupancy = snapshot.occupancy,
        status = %snapshot.status,
        resident = ?snapshot.resident_species,
        "Evaluating placement"
    );

    check_placement(&snapshot, candidate)?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::models::CageStatus;

    fn snapshot(
        capacity: u32,
        status: CageStatus,
        occupancy: u32,
        resident_species: Option<Species>,
    ) -> PlacementSnapshot {
        PlacementSnapshot {
            cage_id: CageId::new(),
            capacity,
            status,
            occupancy,
            resident_species,
        }
    }

    fn code(result: AppResult<()>) -> Option<ErrorCode> {
        result.err().map(|e| e.code)
    }

    #[test]
    fn test_empty_active_cage_accepts_anything() {
        for species in Species::ALL {
            let empty = snapshot(1, CageStatus::Active, 0, None);
            assert!(check_placement(&empty, species).is_ok(), "{species}");
        }
    }

    #[test]
    fn test_down_cage_rejects_even_with_room() {
        let down = snapshot(10, CageStatus::Down, 0, None);
        assert_eq!(
            code(check_placement(&down, Species::Stegosaurus)),
            Some(ErrorCode::CagePoweredDown)
        );
    }

    #[test]
    fn test_power_checked_before_capacity() {
        let down_and_full = snapshot(1, CageStatus::Down, 1, Some(Species::Stegosaurus));
        assert_eq!(
            code(check_placement(&down_and_full, Species::Stegosaurus)),
            Some(ErrorCode::CagePoweredDown)
        );
    }

    #[test]
    fn test_capacity_checked_before_species() {
        let full = snapshot(1, CageStatus::Active, 1, Some(Species::Tyrannosaurus));
        assert_eq!(
            code(check_placement(&full, Species::Triceratops)),
            Some(ErrorCode::CapacityExceeded)
        );
    }

    #[test]
    fn test_diets_never_mix() {
        let carnivores = snapshot(5, CageStatus::Active, 1, Some(Species::Spinosaurus));
        let herbivores = snapshot(5, CageStatus::Active, 1, Some(Species::Brachiosaurus));
        assert_eq!(
            code(check_placement(&carnivores, Species::Ankylosaurus)),
            Some(ErrorCode::SpeciesMismatch)
        );
        assert_eq!(
            code(check_placement(&herbivores, Species::Megalosaurus)),
            Some(ErrorCode::SpeciesMismatch)
        );
    }

    #[test]
    fn test_carnivores_require_same_species() {
        let rexes = snapshot(5, CageStatus::Active, 2, Some(Species::Tyrannosaurus));
        assert!(check_placement(&rexes, Species::Tyrannosaurus).is_ok());
        assert_eq!(
            code(check_placement(&rexes, Species::Velociraptor)),
            Some(ErrorCode::SpeciesMismatch)
        );
    }

    #[test]
    fn test_herbivores_of_different_species_cohabit() {
        let herd = snapshot(5, CageStatus::Active, 3, Some(Species::Ankylosaurus));
        for species in [
            Species::Brachiosaurus,
            Species::Stegosaurus,
            Species::Ankylosaurus,
            Species::Triceratops,
        ] {
            assert!(check_placement(&herd, species).is_ok(), "{species}");
        }
    }

    #[test]
    fn test_mismatch_names_the_cage() {
        let rexes = snapshot(5, CageStatus::Active, 1, Some(Species::Tyrannosaurus));
        let err = check_placement(&rexes, Species::Triceratops).unwrap_err();
        assert_eq!(
            err.context.resource_id,
            Some(rexes.cage_id.to_string())
        );
    }
}
