// ABOUTME: Demo park seeder for paddock-cli
// ABOUTME: Creates random cages and fills them with rule-abiding residents through the park service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use std::collections::BTreeMap;

use anyhow::Result;
use paddock::{
    database_plugins::factory::Database,
    models::{CageStatus, Diet, Species},
    services::ParkService,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::info;

use crate::helpers::display::print_json;

const NAMES: &[&str] = &[
    "Rexy", "Blue", "Charlie", "Delta", "Echo", "Ducky", "Littlefoot", "Cera", "Spike", "Petrie",
    "Bumpy", "Sarah", "Yoshi", "Barney", "Dino", "Ruby",
];

const MIN_CAPACITY: u32 = 2;
const MAX_CAPACITY: u32 = 8;

/// Seed `cage_count` cages, roughly one in five powered down and empty
pub async fn run(park: &ParkService<Database>, cage_count: u32, seed: Option<u64>) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    info!("Seeding {} cage(s) with random seed {}", cage_count, seed);

    let herbivores: Vec<Species> = Species::ALL
        .into_iter()
        .filter(|species| species.diet() == Diet::Herbivore)
        .collect();

    let mut by_species: BTreeMap<String, u32> = BTreeMap::new();
    let mut placed = 0_u32;

    for _ in 0..cage_count {
        let capacity = rng.gen_range(MIN_CAPACITY..=MAX_CAPACITY);
        let status = if rng.gen_ratio(1, 5) {
            CageStatus::Down
        } else {
            CageStatus::Active
        };
        let cage = park.add_cage(capacity, status).await?;
        if status == CageStatus::Down {
            continue;
        }

        let Some(&founder) = Species::ALL.choose(&mut rng) else {
            continue;
        };
        let residents = rng.gen_range(0..=cage.available_slots());
        for _ in 0..residents {
            let species = match founder.diet() {
                Diet::Carnivore => founder,
                Diet::Herbivore => herbivores.choose(&mut rng).copied().unwrap_or(founder),
            };
            let name = NAMES.choose(&mut rng).copied().unwrap_or("Unnamed");
            park.add_dinosaur(name, species, cage.id).await?;
            *by_species.entry(species.to_string()).or_default() += 1;
            placed += 1;
        }
    }

    info!("Seeded {} dinosaur(s)", placed);
    print_json(&json!({
        "seed": seed,
        "cages": cage_count,
        "dinosaurs": placed,
        "by_species": by_species,
    }))
}
