// ABOUTME: Unified error taxonomy for cage and dinosaur operations
// ABOUTME: Error codes, AppError with context and source chaining, and result alias
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! # Unified Error Handling System
//!
//! Every operation of the placement core returns [`AppResult`]. The [`ErrorCode`]
//! separates three families:
//!
//! - rule violations detected from data read inside the operation's transaction
//!   (`ResourceNotFound`, `OccupancyConflict`, `CagePoweredDown`,
//!   `CapacityExceeded`, `SpeciesMismatch`)
//! - malformed caller input (`InvalidInput`)
//! - system failures (`DatabaseError`, `OperationTimeout`, `ConfigError`,
//!   `InternalError`), which wrap their underlying cause as `source`

#[cfg(feature = "database-errors")]
mod database;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Caller supplied a malformed value
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,

    // Resource Management (4000-4999)
    /// Referenced cage or dinosaur does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// Mutation blocked by current occupancy (delete or power down of a non-empty cage)
    #[serde(rename = "OCCUPANCY_CONFLICT")]
    OccupancyConflict = 4001,

    // Placement rules (4100-4199)
    /// Destination cage is powered down
    #[serde(rename = "CAGE_POWERED_DOWN")]
    CagePoweredDown = 4100,
    /// Destination cage is full
    #[serde(rename = "CAPACITY_EXCEEDED")]
    CapacityExceeded = 4101,
    /// Candidate species cannot share the destination cage
    #[serde(rename = "SPECIES_MISMATCH")]
    SpeciesMismatch = 4102,

    // Configuration (6000-6999)
    /// Configuration could not be loaded
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Underlying store failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// Operation deadline elapsed before commit
    #[serde(rename = "OPERATION_TIMEOUT")]
    OperationTimeout = 9002,
}

impl ErrorCode {
    /// HTTP status a request-handling layer should report for this code
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::ResourceNotFound => 404,
            Self::OccupancyConflict
            | Self::CagePoweredDown
            | Self::CapacityExceeded
            | Self::SpeciesMismatch => 409,
            Self::OperationTimeout => 503,
            Self::ConfigError | Self::InternalError | Self::DatabaseError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::OccupancyConflict => "The cage is occupied",
            Self::CagePoweredDown => "The cage is powered down",
            Self::CapacityExceeded => "The cage capacity is exceeded",
            Self::SpeciesMismatch => "The species cannot share this cage",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::OperationTimeout => "The operation did not complete before its deadline",
        }
    }

    /// Whether the code reports a request the current park state rejects
    ///
    /// These are never retried and never indicate system unavailability.
    #[must_use]
    pub const fn is_domain_violation(self) -> bool {
        matches!(
            self,
            Self::ResourceNotFound
                | Self::OccupancyConflict
                | Self::CagePoweredDown
                | Self::CapacityExceeded
                | Self::SpeciesMismatch
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Identifier of the cage or dinosaur involved
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Whether this error reports a store or runtime failure rather than a rejected request
    #[must_use]
    pub const fn is_store_error(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::DatabaseError | ErrorCode::OperationTimeout | ErrorCode::InternalError
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Convenience functions for creating common errors
impl AppError {
    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Mutation blocked by the cage's current occupancy
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::OccupancyConflict, message)
    }

    /// Placement into a powered down cage
    pub fn cage_powered_down(cage_id: impl Into<String>) -> Self {
        let cage_id = cage_id.into();
        Self::new(
            ErrorCode::CagePoweredDown,
            format!("Cage {cage_id} is powered down"),
        )
        .with_resource_id(cage_id)
    }

    /// Placement into a full cage
    pub fn capacity_exceeded(cage_id: impl Into<String>, capacity: u32) -> Self {
        let cage_id = cage_id.into();
        Self::new(
            ErrorCode::CapacityExceeded,
            format!("Cage {cage_id} already houses {capacity} of {capacity}"),
        )
        .with_resource_id(cage_id)
        .with_details(serde_json::json!({ "capacity": capacity }))
    }

    /// Placement next to incompatible residents
    pub fn species_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SpeciesMismatch, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Operation deadline elapsed
    #[must_use]
    pub fn timeout(operation: &str, millis: u128) -> Self {
        Self::new(
            ErrorCode::OperationTimeout,
            format!("{operation} did not complete within {millis}ms"),
        )
    }
}
