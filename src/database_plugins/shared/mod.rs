// ABOUTME: Shared database logic for PostgreSQL, SQLite, and in-memory backends
// ABOUTME: Transactions, enum column conversions, and timestamp encoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

/// Enum conversion utilities (`CageStatus`, `Species`)
pub mod enums;

/// Microsecond clock and RFC 3339 column encoding
pub mod timestamps;

/// Transaction guard and retry patterns (lock conflicts, exponential backoff)
pub mod transactions;
