// ABOUTME: Dinosaur models and the fixed species to diet classification
// ABOUTME: Dinosaur entity, creation request, list filter, Species and Diet enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CageId, DinosaurId};
use crate::constants::dinosaurs::MAX_NAME_LENGTH;
use crate::errors::{AppError, AppResult};

/// Diet classification ("species type") used by compatibility decisions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    /// Meat eater; tolerates only its own exact species as cage-mates
    Carnivore,
    /// Plant eater; cohabits with any other herbivore
    Herbivore,
}

impl Diet {
    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Carnivore => "carnivore",
            Self::Herbivore => "herbivore",
        }
    }
}

impl Display for Diet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Supported dinosaur species
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Carnivore
    Tyrannosaurus,
    /// Carnivore
    Velociraptor,
    /// Carnivore
    Spinosaurus,
    /// Carnivore
    Megalosaurus,
    /// Herbivore
    Brachiosaurus,
    /// Herbivore
    Stegosaurus,
    /// Herbivore
    Ankylosaurus,
    /// Herbivore
    Triceratops,
}

impl Species {
    /// Every supported species
    pub const ALL: [Self; 8] = [
        Self::Tyrannosaurus,
        Self::Velociraptor,
        Self::Spinosaurus,
        Self::Megalosaurus,
        Self::Brachiosaurus,
        Self::Stegosaurus,
        Self::Ankylosaurus,
        Self::Triceratops,
    ];

    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tyrannosaurus => "tyrannosaurus",
            Self::Velociraptor => "velociraptor",
            Self::Spinosaurus => "spinosaurus",
            Self::Megalosaurus => "megalosaurus",
            Self::Brachiosaurus => "brachiosaurus",
            Self::Stegosaurus => "stegosaurus",
            Self::Ankylosaurus => "ankylosaurus",
            Self::Triceratops => "triceratops",
        }
    }

    /// Diet of this species
    #[must_use]
    pub const fn diet(&self) -> Diet {
        match self {
            Self::Tyrannosaurus | Self::Velociraptor | Self::Spinosaurus | Self::Megalosaurus => {
                Diet::Carnivore
            }
            Self::Brachiosaurus | Self::Stegosaurus | Self::Ankylosaurus | Self::Triceratops => {
                Diet::Herbivore
            }
        }
    }
}

impl Display for Species {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|species| species.as_str() == lowered)
            .ok_or_else(|| AppError::invalid_input(format!("Invalid species: {s}")))
    }
}

/// A dinosaur assigned to exactly one cage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dinosaur {
    /// Unique dinosaur identifier
    pub id: DinosaurId,
    /// Display name
    pub name: String,
    /// Species; never changes after creation
    pub species: Species,
    /// Cage the dinosaur is assigned to
    pub cage_id: CageId,
    /// When the dinosaur was created
    pub created_at: DateTime<Utc>,
    /// When the dinosaur was last updated
    pub updated_at: DateTime<Utc>,
}

/// Validated request to place a new dinosaur
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDinosaur {
    name: String,
    species: Species,
    cage_id: CageId,
}

impl NewDinosaur {
    /// Build a placement request
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the name is blank or longer than the limit
    pub fn new(name: impl Into<String>, species: Species, cage_id: CageId) -> AppResult<Self> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(AppError::invalid_input("Dinosaur name is required"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Dinosaur name exceeds {MAX_NAME_LENGTH} characters"
            )));
        }
        Ok(Self {
            name,
            species,
            cage_id,
        })
    }

    /// Requested name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requested species
    #[must_use]
    pub const fn species(&self) -> Species {
        self.species
    }

    /// Destination cage
    #[must_use]
    pub const fn cage_id(&self) -> CageId {
        self.cage_id
    }
}

/// Optional filters for listing dinosaurs; present filters combine with AND
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DinosaurFilter {
    /// Only dinosaurs in this cage
    pub cage_id: Option<CageId>,
    /// Only dinosaurs of this species
    pub species: Option<Species>,
}

impl DinosaurFilter {
    /// Filter by cage
    #[must_use]
    pub fn in_cage(mut self, cage_id: CageId) -> Self {
        self.cage_id = Some(cage_id);
        self
    }

    /// Filter by species
    #[must_use]
    pub fn of_species(mut self, species: Species) -> Self {
        self.species = Some(species);
        self
    }

    /// Whether a dinosaur passes every present filter
    #[must_use]
    pub fn matches(&self, dinosaur: &Dinosaur) -> bool {
        self.cage_id.is_none_or(|id| id == dinosaur.cage_id)
            && self.species.is_none_or(|s| s == dinosaur.species)
    }
}
