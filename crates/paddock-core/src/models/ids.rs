// ABOUTME: Type-safe identifiers for cages and dinosaurs
// ABOUTME: UUID newtypes accepting only the canonical hyphenated textual form
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::ids::ID_LENGTH;
use crate::errors::AppError;

/// Parse the canonical `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` form
///
/// `Uuid::parse_str` also accepts simple, braced, and URN spellings; those
/// are rejected here so every stored identifier has one textual form.
fn parse_canonical(kind: &str, s: &str) -> Result<Uuid, AppError> {
    if s.len() != ID_LENGTH {
        return Err(AppError::invalid_input(format!("Invalid {kind} ID: {s}")));
    }
    Uuid::parse_str(s)
        .map_err(|e| AppError::invalid_input(format!("Invalid {kind} ID: {s}")).with_source(e))
}

macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random identifier
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID value
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_canonical($kind, s).map(Self)
            }
        }
    };
}

uuid_newtype!(
    /// Type-safe wrapper for cage identifiers
    CageId,
    "cage"
);

uuid_newtype!(
    /// Type-safe wrapper for dinosaur identifiers
    DinosaurId,
    "dinosaur"
);
