// ABOUTME: Paddock CLI - operator command-line tool for cages and dinosaurs
// ABOUTME: Runs every park operation against the configured store and prints JSON results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors
//!
//! Usage:
//! ```bash
//! # Create a powered cage with room for four
//! paddock-cli cages add --capacity 4
//!
//! # List cages that are powered down
//! paddock-cli cages list --status down
//!
//! # Place a dinosaur
//! paddock-cli dinosaurs add --name Rexy --species tyrannosaurus --cage <cage-id>
//!
//! # Move it somewhere else
//! paddock-cli dinosaurs move <dinosaur-id> --cage <cage-id>
//!
//! # Populate a demo park reproducibly
//! paddock-cli seed --cages 6 --seed 42
//! ```

mod commands;
mod helpers;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paddock::{
    config::{DatabaseUrl, ParkConfig},
    database_plugins::factory::Database,
    logging::LoggingConfig,
    models::{CageId, CageStatus, DinosaurId, Species},
    services::ParkService,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "paddock-cli",
    about = "Paddock cage and dinosaur management CLI",
    long_about = "Operator tool for creating cages, placing and moving dinosaurs, and seeding a demo park."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Cage management commands
    Cages {
        #[command(subcommand)]
        action: CageCommand,
    },

    /// Dinosaur management commands
    Dinosaurs {
        #[command(subcommand)]
        action: DinosaurCommand,
    },

    /// Populate the store with randomly generated, rule-abiding cages and dinosaurs
    Seed {
        /// Number of cages to create
        #[arg(long, default_value = "5")]
        cages: u32,

        /// RNG seed for a reproducible park (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum CageCommand {
    /// Create a new empty cage
    Add {
        /// Maximum number of dinosaurs
        #[arg(long)]
        capacity: u32,

        /// Initial power status (active or down)
        #[arg(long, default_value = "active")]
        status: CageStatus,
    },

    /// List cages with their live occupancy
    List {
        /// Only cages with this status
        #[arg(long)]
        status: Option<CageStatus>,
    },

    /// Show one cage
    Get {
        /// Cage ID
        cage_id: CageId,
    },

    /// Power a cage up or down
    Status {
        /// Cage ID
        cage_id: CageId,

        /// New status (active or down)
        status: CageStatus,
    },

    /// Delete an empty cage
    Delete {
        /// Cage ID
        cage_id: CageId,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum DinosaurCommand {
    /// Place a new dinosaur into a cage
    Add {
        /// Dinosaur name
        #[arg(long)]
        name: String,

        /// Species (e.g. tyrannosaurus, triceratops)
        #[arg(long)]
        species: Species,

        /// Destination cage ID
        #[arg(long)]
        cage: CageId,
    },

    /// List dinosaurs
    List {
        /// Only dinosaurs in this cage
        #[arg(long)]
        cage: Option<CageId>,

        /// Only dinosaurs of this species
        #[arg(long)]
        species: Option<Species>,
    },

    /// Show one dinosaur
    Get {
        /// Dinosaur ID
        dinosaur_id: DinosaurId,
    },

    /// Move a dinosaur into another cage
    Move {
        /// Dinosaur ID
        dinosaur_id: DinosaurId,

        /// Destination cage ID
        #[arg(long)]
        cage: CageId,
    },

    /// Remove a dinosaur
    Delete {
        /// Dinosaur ID
        dinosaur_id: DinosaurId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = ParkConfig::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url);
    }

    if let DatabaseUrl::SQLite { path } = &config.database.url {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    info!("Connecting to database: {}", config.database.url.redacted());
    let database = Database::new(
        &config.database.url.to_connection_string(),
        &config.database.pool,
    )
    .await
    .context("Failed to open store")?;
    info!("Store backend: {}", database.backend_info());

    let park = ParkService::new(database, config.transactions);

    match cli.command {
        Command::Cages { action } => match action {
            CageCommand::Add { capacity, status } => {
                commands::cages::add(&park, capacity, status).await?;
            }
            CageCommand::List { status } => commands::cages::list(&park, status).await?,
            CageCommand::Get { cage_id } => commands::cages::get(&park, cage_id).await?,
            CageCommand::Status { cage_id, status } => {
                commands::cages::set_status(&park, cage_id, status).await?;
            }
            CageCommand::Delete { cage_id } => commands::cages::delete(&park, cage_id).await?,
        },
        Command::Dinosaurs { action } => match action {
            DinosaurCommand::Add {
                name,
                species,
                cage,
            } => commands::dinosaurs::add(&park, &name, species, cage).await?,
            DinosaurCommand::List { cage, species } => {
                commands::dinosaurs::list(&park, cage, species).await?;
            }
            DinosaurCommand::Get { dinosaur_id } => {
                commands::dinosaurs::get(&park, dinosaur_id).await?;
            }
            DinosaurCommand::Move { dinosaur_id, cage } => {
                commands::dinosaurs::relocate(&park, dinosaur_id, cage).await?;
            }
            DinosaurCommand::Delete { dinosaur_id } => {
                commands::dinosaurs::delete(&park, dinosaur_id).await?;
            }
        },
        Command::Seed { cages, seed } => commands::seed::run(&park, cages, seed).await?,
    }

    Ok(())
}
