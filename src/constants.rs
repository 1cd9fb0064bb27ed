// ABOUTME: System-wide constants for environment variable names and configuration defaults
// ABOUTME: Re-exports domain limits from the core crate alongside runtime defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! # Constants Module

pub use paddock_core::constants::{dinosaurs, ids, tables};

/// Service identity used in structured logs
pub mod service_names {
    /// Library and CLI service name
    pub const PADDOCK: &str = "paddock";
}

/// Environment variable names
pub mod env_config {
    /// Store connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Pool size
    pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
    /// `SQLite` busy timeout / `PostgreSQL` acquire timeout
    pub const DATABASE_BUSY_TIMEOUT_MS: &str = "DATABASE_BUSY_TIMEOUT_MS";
    /// Attempts for retryable store conflicts
    pub const TRANSACTION_MAX_RETRIES: &str = "TRANSACTION_MAX_RETRIES";
    /// Per-operation deadline, 0 disables
    pub const OPERATION_TIMEOUT_MS: &str = "OPERATION_TIMEOUT_MS";
    /// Log filter
    pub const RUST_LOG: &str = "RUST_LOG";
    /// Log output format
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Deployment environment label
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Configuration defaults
pub mod defaults {
    /// Default store location
    pub const DATABASE_URL: &str = "sqlite:./data/paddock.db";
    /// Default pool size
    pub const DATABASE_MAX_CONNECTIONS: u32 = 10;
    /// Default busy timeout in milliseconds
    pub const DATABASE_BUSY_TIMEOUT_MS: u64 = 5000;
    /// Default attempts per compound operation
    pub const TRANSACTION_MAX_RETRIES: u32 = 3;
    /// Default deadline in milliseconds (disabled)
    pub const OPERATION_TIMEOUT_MS: u64 = 0;
}
