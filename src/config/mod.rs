// ABOUTME: Configuration management module for environment-driven settings
// ABOUTME: Database location and pool, transaction policy, log level, and environment label
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! Configuration is read from environment variables only; there are no
//! configuration files.

/// Database URL and connection pool settings
pub mod database;

/// Environment label, log level, transaction policy, and `ParkConfig`
pub mod environment;

pub use database::{DatabaseConfig, DatabaseUrl, PoolConfig};
pub use environment::{Environment, LogLevel, ParkConfig, TransactionConfig};
