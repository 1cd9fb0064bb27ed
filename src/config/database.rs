// ABOUTME: Database configuration types for SQLite and PostgreSQL connections
// ABOUTME: Type-safe database URL parsing and connection pool settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::environment::{env_var_or, parse_env};
use crate::constants::{defaults, env_config};
use crate::errors::{AppError, AppResult};

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// `PostgreSQL` connection
    PostgreSQL {
        /// `PostgreSQL` connection string
        connection_string: String,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string
    ///
    /// Anything that is neither `sqlite:` nor a `PostgreSQL` URL is taken as
    /// an `SQLite` file path.
    #[must_use]
    pub fn parse_url(s: &str) -> Self {
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Self::Memory
            } else {
                Self::SQLite {
                    path: PathBuf::from(path_str.trim_start_matches("//")),
                }
            }
        } else if s.starts_with("postgresql://") || s.starts_with("postgres://") {
            Self::PostgreSQL {
                connection_string: s.to_owned(),
            }
        } else {
            Self::SQLite {
                path: PathBuf::from(s),
            }
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::PostgreSQL { connection_string } => connection_string.clone(),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }

    /// Check if this is a `SQLite` database
    #[must_use]
    pub const fn is_sqlite(&self) -> bool {
        matches!(self, Self::SQLite { .. } | Self::Memory)
    }

    /// Check if this is a `PostgreSQL` database
    #[must_use]
    pub const fn is_postgresql(&self) -> bool {
        matches!(self, Self::PostgreSQL { .. })
    }

    /// Connection string with any password replaced, for logs
    #[must_use]
    pub fn redacted(&self) -> String {
        match self {
            Self::PostgreSQL { connection_string } => redact_password(connection_string),
            other => other.to_connection_string(),
        }
    }
}

fn redact_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_owned();
    };
    let Some((credentials, host)) = rest.split_once('@') else {
        return url.to_owned();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_owned(),
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::parse_url(defaults::DATABASE_URL)
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Connection pool settings shared by both SQL backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// How long a writer waits for the `SQLite` lock or a `PostgreSQL` connection
    pub busy_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: defaults::DATABASE_MAX_CONNECTIONS,
            busy_timeout: Duration::from_millis(defaults::DATABASE_BUSY_TIMEOUT_MS),
        }
    }
}

impl PoolConfig {
    /// Load pool settings from environment
    ///
    /// # Errors
    ///
    /// Returns a config error if a variable is set but not a number, or the
    /// pool size is zero
    pub fn from_env() -> AppResult<Self> {
        let max_connections: u32 = parse_env(
            env_config::DATABASE_MAX_CONNECTIONS,
            defaults::DATABASE_MAX_CONNECTIONS,
        )?;
        if max_connections == 0 {
            return Err(AppError::config(format!(
                "{} must be at least 1",
                env_config::DATABASE_MAX_CONNECTIONS
            )));
        }
        let busy_timeout_ms: u64 = parse_env(
            env_config::DATABASE_BUSY_TIMEOUT_MS,
            defaults::DATABASE_BUSY_TIMEOUT_MS,
        )?;
        Ok(Self {
            max_connections,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
        })
    }
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// Database URL (`SQLite` path or `PostgreSQL` connection string)
    pub url: DatabaseUrl,
    /// Connection pool settings
    pub pool: PoolConfig,
}

impl DatabaseConfig {
    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if pool variables are invalid
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            url: DatabaseUrl::parse_url(&env_var_or(
                env_config::DATABASE_URL,
                defaults::DATABASE_URL,
            )),
            pool: PoolConfig::from_env()?,
        })
    }
}
