// ABOUTME: Domain models for cages, dinosaurs, and species classification
// ABOUTME: Re-exports identifiers, entities, filters, and placement snapshots
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

mod cage;
mod dinosaur;
mod ids;

pub use cage::{Cage, CageStatus, NewCage, PlacementSnapshot};
pub use dinosaur::{Diet, Dinosaur, DinosaurFilter, NewDinosaur, Species};
pub use ids::{CageId, DinosaurId};
