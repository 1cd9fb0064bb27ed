// ABOUTME: Main library entry point for the Paddock cage and dinosaur placement service
// ABOUTME: Transactional consistency core over pluggable SQLite, PostgreSQL, and in-memory stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

#![deny(unsafe_code)]

//! # Paddock
//!
//! Keeps dinosaurs in cages without breaking the park rules, even when many
//! callers mutate the same cage at once.
//!
//! ## Rules
//!
//! - a cage never houses more dinosaurs than its capacity
//! - a powered-down cage is always empty
//! - herbivores and carnivores never share a cage
//! - carnivores only share a cage with their own species
//!
//! Occupancy is never stored; it is counted from the dinosaur rows each time
//! a cage is read, so it cannot drift.
//!
//! ## Architecture
//!
//! - **Models**: cage, dinosaur, species and diet types (from `paddock-core`)
//! - **Database plugins**: the [`ParkDatabase`](database_plugins::ParkDatabase)
//!   and [`ParkTransaction`](database_plugins::ParkTransaction) traits with
//!   SQLite, PostgreSQL, and in-memory backends
//! - **Services**: rule routines and the [`ParkService`](services::ParkService)
//!   facade that wraps each operation in one transaction
//!
//! ## Example
//!
//! ```rust,no_run
//! use paddock::config::{PoolConfig, TransactionConfig};
//! use paddock::database_plugins::factory::Database;
//! use paddock::models::{CageStatus, Species};
//! use paddock::services::ParkService;
//!
//! # async fn example() -> paddock::errors::AppResult<()> {
//! let database = Database::new("sqlite::memory:", &PoolConfig::default()).await?;
//! let park = ParkService::new(database, TransactionConfig::default());
//!
//! let cage = park.add_cage(2, CageStatus::Active).await?;
//! park.add_dinosaur("Rexy", Species::Tyrannosaurus, cage.id).await?;
//! # Ok(())
//! # }
//! ```

/// Configuration loaded from the environment
pub mod config;

/// Application constants and environment variable names
pub mod constants;

/// Store traits and backends
pub mod database_plugins;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Domain models
pub mod models;

/// Placement rules and the operation facade
pub mod services;
