// ABOUTME: Transaction management with RAII guards and retry patterns for park operations
// ABOUTME: Automatic rollback on drop and exponential backoff for SQLite and PostgreSQL lock conflicts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! Transaction management with RAII guards and retry patterns
//!
//! - `TransactionGuard`: wraps an `SQLx` transaction and rolls back if dropped
//!   before `commit()`. Dropping an operation future (cancellation, deadline)
//!   therefore leaves no partial writes behind.
//! - `retry_transaction`: re-runs a whole begin/check/write/commit attempt when
//!   the store reports a transient lock conflict.
//!
//! ```text
//! retry_transaction(|| async {
//!     let mut tx = SqliteTransactionGuard::new(pool.begin().await?);
//!     sqlx::query("UPDATE cages ...").execute(tx.executor()?).await?;
//!     tx.commit().await
//! }, 3).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use sqlx::{Database, Transaction};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::errors::{AppError, AppResult, ErrorCode};

/// Retry a transactional attempt when it fails with a transient store conflict
///
/// `max_retries` is the total number of attempts. Only `DatabaseError`s whose
/// message looks like a lock, busy, deadlock, timeout, or serialization
/// failure are retried; rule violations (`CapacityExceeded`, `Conflict`, ...)
/// and every other failure are returned from the first attempt unchanged.
///
/// Backoff doubles from 20ms: 20ms, 40ms, 80ms, ...
///
/// # Errors
///
/// Returns the last error once attempts are exhausted, or the first
/// non-retryable error.
pub async fn retry_transaction<F, Fut, T>(mut f: F, max_retries: u32) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let max_retries = max_retries.max(1);
    let mut attempts = 0;
    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempts += 1;
                if !is_retryable(&e) {
                    if e.is_store_error() {
                        error!(
                            attempts = attempts,
                            error = %e,
                            "Transaction failed with non-retryable error"
                        );
                    }
                    return Err(e);
                }
                if attempts >= max_retries {
                    error!(
                        attempts = attempts,
                        max_retries = max_retries,
                        error = %e,
                        "Transaction failed after max retries"
                    );
                    return Err(e);
                }

                let backoff_ms = 10 * (1_u64 << attempts.min(10));
                warn!(
                    attempt = attempts,
                    max_retries = max_retries,
                    backoff_ms = backoff_ms,
                    error = %e,
                    "Transaction failed with retryable error, retrying after backoff"
                );
                sleep(Duration::from_millis(backoff_ms)).await;
            }
        }
    }
}

/// Whether an error is a transient store conflict worth another attempt
#[must_use]
pub fn is_retryable(error: &AppError) -> bool {
    error.code == ErrorCode::DatabaseError && is_retryable_error(&format!("{error:?}"))
}

/// Classify a store error message
///
/// Retryable: deadlock (`PostgreSQL`), database locked or busy (`SQLite`),
/// timeouts, serialization failures. Constraint violations, connection and
/// permission errors, and anything unrecognised are not.
fn is_retryable_error(error_msg: &str) -> bool {
    let error_lower = error_msg.to_lowercase();

    if error_lower.contains("unique constraint")
        || error_lower.contains("foreign key constraint")
        || error_lower.contains("check constraint")
        || error_lower.contains("not null constraint")
    {
        return false;
    }

    if error_lower.contains("connection refused")
        || error_lower.contains("permission denied")
        || error_lower.contains("authentication failed")
    {
        return false;
    }

    error_lower.contains("deadlock")
        || error_lower.contains("database is locked")
        || error_lower.contains("locked")
        || error_lower.contains("busy")
        || error_lower.contains("timeout")
        || error_lower.contains("timed out")
        || error_lower.contains("serialization failure")
        || error_lower.contains("could not serialize")
}

/// RAII guard for database transactions ensuring automatic rollback on drop
///
/// `commit` and `rollback` consume the guard, so a transaction can be
/// finished at most once.
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    committed: bool,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Wrap a transaction obtained from `pool.begin().await`
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>) -> Self {
        debug!("TransactionGuard created - transaction will auto-rollback if not committed");
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already consumed or the
    /// commit fails. A failed commit leaves nothing applied.
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot commit"))?;
        tx.commit().await.map_err(|e| {
            AppError::database(format!("Transaction commit failed: {e}")).with_source(e)
        })?;
        self.committed = true;
        debug!("TransactionGuard committed successfully");
        Ok(())
    }

    /// Explicitly roll back the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already consumed or the
    /// rollback statement fails
    pub async fn rollback(mut self) -> AppResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed - cannot rollback"))?;
        tx.rollback().await.map_err(|e| {
            AppError::database(format!("Transaction rollback failed: {e}")).with_source(e)
        })?;
        debug!("TransactionGuard rolled back explicitly");
        Ok(())
    }

    /// Check if the transaction has been committed
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// Connection to execute queries against inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already committed or rolled back
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit/rollback")
        })
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            // SQLx rolls the transaction back when it is dropped
            warn!(
                "TransactionGuard dropped without commit - transaction will be rolled back automatically"
            );
        }
    }
}

/// Type alias for `SQLite` transaction guard
pub type SqliteTransactionGuard<'c> = TransactionGuard<'c, sqlx::Sqlite>;

/// Type alias for `PostgreSQL` transaction guard
#[cfg(feature = "postgresql")]
pub type PostgresTransactionGuard<'c> = TransactionGuard<'c, sqlx::Postgres>;
