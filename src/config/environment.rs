// ABOUTME: Environment-based configuration for the park service and CLI
// ABOUTME: Log level, deployment environment, transaction policy, and the aggregate ParkConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::database::DatabaseConfig;
use crate::constants::{defaults, env_config};
use crate::errors::{AppError, AppResult};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level only
    Error,
    /// Warning level and above
    Warn,
    /// Info level and above (default)
    #[default]
    Info,
    /// Debug level and above
    Debug,
    /// All levels including trace
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }

    /// Directive string for `EnvFilter`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Deployment environment label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Testing => "testing",
        })
    }
}

/// How compound operations are retried and bounded in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionConfig {
    /// Total attempts when the store reports a transient lock conflict
    pub max_retries: u32,
    /// Deadline for one whole operation including retries; `None` waits indefinitely
    pub operation_timeout: Option<Duration>,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::TRANSACTION_MAX_RETRIES,
            operation_timeout: None,
        }
    }
}

impl TransactionConfig {
    /// Load transaction policy from environment
    ///
    /// # Errors
    ///
    /// Returns a config error if a variable is set but not a number
    pub fn from_env() -> AppResult<Self> {
        let max_retries: u32 = parse_env(
            env_config::TRANSACTION_MAX_RETRIES,
            defaults::TRANSACTION_MAX_RETRIES,
        )?;
        let timeout_ms: u64 = parse_env(
            env_config::OPERATION_TIMEOUT_MS,
            defaults::OPERATION_TIMEOUT_MS,
        )?;
        Ok(Self {
            max_retries: max_retries.max(1),
            operation_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
        })
    }
}

/// Complete configuration for the park service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParkConfig {
    /// Logging level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Store location and pool
    pub database: DatabaseConfig,
    /// Retry and deadline policy
    pub transactions: TransactionConfig,
}

impl ParkConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a config error if any numeric variable is malformed
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");
        let config = Self {
            log_level: LogLevel::from_str_or_default(&env_var_or(env_config::RUST_LOG, "info")),
            environment: Environment::from_str_or_default(&env_var_or(
                env_config::ENVIRONMENT,
                "development",
            )),
            database: DatabaseConfig::from_env()?,
            transactions: TransactionConfig::from_env()?,
        };
        info!("{}", config.summary());
        Ok(config)
    }

    /// One-line description safe to log
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Paddock configuration: environment={}, log_level={}, database={}, max_connections={}, busy_timeout={}ms, max_retries={}, operation_timeout={}",
            self.environment,
            self.log_level,
            self.database.url.redacted(),
            self.database.pool.max_connections,
            self.database.pool.busy_timeout.as_millis(),
            self.transactions.max_retries,
            self.transactions
                .operation_timeout
                .map_or_else(|| "disabled".to_owned(), |d| format!("{}ms", d.as_millis())),
        )
    }
}

/// Environment variable or a default
pub(crate) fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset
///
/// # Errors
///
/// Returns a config error naming the variable when it is set but unparseable
pub(crate) fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}
