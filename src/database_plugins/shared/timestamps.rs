// ABOUTME: Fixed-precision timestamp helpers shared by every store backend
// ABOUTME: Microsecond-truncated UTC clock plus RFC 3339 text encoding for SQLite columns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

use crate::errors::{AppError, AppResult};

/// Current UTC time truncated to microseconds
///
/// Both SQL backends persist microseconds, so a value produced here and
/// returned from a write compares equal to the value later read back.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Encode for a TEXT column; fixed width so lexical order is chronological
#[must_use]
pub fn encode(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a TEXT column written by [`encode`]
///
/// # Errors
///
/// Returns a database error if the stored value is not RFC 3339
pub fn decode(column: &str, value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            AppError::database(format!("Invalid timestamp in column '{column}': {value}"))
                .with_source(e)
        })
}
