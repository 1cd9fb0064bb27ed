// ABOUTME: Cage models with power status and derived occupancy
// ABOUTME: Cage aggregate, creation request, and the snapshot read by placement rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CageId, Species};
use crate::errors::{AppError, AppResult};

/// Power status of a cage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CageStatus {
    /// Powered; may receive new residents
    Active,
    /// Powered down; may never gain residents
    Down,
}

impl CageStatus {
    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Down => "down",
        }
    }

    /// Whether the cage accepts new residents
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Display for CageStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for CageStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "down" => Ok(Self::Down),
            _ => Err(AppError::invalid_input(format!("Invalid cage status: {s}"))),
        }
    }
}

/// A cage with its live occupancy
///
/// `occupancy` is never persisted; every backend computes it by counting the
/// dinosaur rows that reference the cage at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cage {
    /// Unique cage identifier
    pub id: CageId,
    /// Maximum number of concurrent residents
    pub capacity: u32,
    /// Power status
    pub status: CageStatus,
    /// Number of dinosaurs currently assigned
    pub occupancy: u32,
    /// When the cage was created
    pub created_at: DateTime<Utc>,
    /// When the cage was last updated
    pub updated_at: DateTime<Utc>,
}

impl Cage {
    /// Remaining free slots
    #[must_use]
    pub const fn available_slots(&self) -> u32 {
        self.capacity.saturating_sub(self.occupancy)
    }
}

/// Validated request to create a cage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCage {
    capacity: u32,
    status: CageStatus,
}

impl NewCage {
    /// Build a creation request
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `capacity` is zero
    pub fn new(capacity: u32, status: CageStatus) -> AppResult<Self> {
        if capacity == 0 {
            return Err(AppError::invalid_input("Cage capacity must be positive"));
        }
        Ok(Self { capacity, status })
    }

    /// Requested capacity
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Requested initial status
    #[must_use]
    pub const fn status(&self) -> CageStatus {
        self.status
    }
}

/// Everything the compatibility rules need to know about a cage
///
/// `resident_species` holds the species of one arbitrary resident and is
/// `None` for an empty cage. Any single resident characterises the cage
/// because every successful placement keeps residents on one diet, and
/// carnivore residents on one exact species.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementSnapshot {
    /// Cage being evaluated
    pub cage_id: CageId,
    /// Maximum number of concurrent residents
    pub capacity: u32,
    /// Power status
    pub status: CageStatus,
    /// Live resident count
    pub occupancy: u32,
    /// Species of any one current resident
    pub resident_species: Option<Species>,
}

impl PlacementSnapshot {
    /// Whether no further resident fits
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.occupancy >= self.capacity
    }

    /// Species that describes the residents, if there are any
    #[must_use]
    pub fn resident(&self) -> Option<Species> {
        self.resident_species.filter(|_| self.occupancy > 0)
    }
}
