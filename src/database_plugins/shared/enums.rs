// ABOUTME: Enum conversion utilities for database columns
// ABOUTME: Stored status and species strings back to domain enums, treating unknown values as store corruption
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use crate::errors::{AppError, AppResult};
use crate::models::{CageStatus, Species};

/// Convert a stored `status` column to `CageStatus`
///
/// # Errors
///
/// Returns a database error for values the schema should have rejected
pub fn str_to_cage_status(s: &str) -> AppResult<CageStatus> {
    s.parse()
        .map_err(|_| AppError::database(format!("Unknown cage status stored: {s}")))
}

/// Convert a stored `species` column to `Species`
///
/// # Errors
///
/// Returns a database error for values the schema should have rejected
pub fn str_to_species(s: &str) -> AppResult<Species> {
    s.parse()
        .map_err(|_| AppError::database(format!("Unknown species stored: {s}")))
}

/// SQL list of valid species for `CHECK` constraints, e.g. `'tyrannosaurus', 'velociraptor'`
#[must_use]
pub fn species_check_list() -> String {
    Species::ALL
        .iter()
        .map(|species| format!("'{}'", species.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_unknown_values_are_store_errors() {
        assert_eq!(str_to_cage_status("down").unwrap(), CageStatus::Down);
        assert_eq!(
            str_to_cage_status("standby").unwrap_err().code,
            ErrorCode::DatabaseError
        );
        assert_eq!(
            str_to_species("stegosaurus").unwrap(),
            Species::Stegosaurus
        );
        assert_eq!(
            str_to_species("dodo").unwrap_err().code,
            ErrorCode::DatabaseError
        );
    }

    #[test]
    fn test_species_check_list_covers_all() {
        let list = species_check_list();
        for species in Species::ALL {
            assert!(list.contains(&format!("'{species}'")));
        }
    }
}
