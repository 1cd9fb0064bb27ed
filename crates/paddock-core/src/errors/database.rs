// ABOUTME: Conversion of SQLx driver errors into the unified error taxonomy
// ABOUTME: Keeps row-not-found distinct while wrapping every other failure as a store error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use super::{AppError, ErrorCode};

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::new(ErrorCode::ResourceNotFound, "Row not found"),
            other => Self::database(other.to_string()).with_source(other),
        }
    }
}
