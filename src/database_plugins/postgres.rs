// ABOUTME: PostgreSQL backend for the park store using SQLx
// ABOUTME: Native UUID and TIMESTAMPTZ columns with SELECT ... FOR UPDATE row locking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Paddock Contributors

//! `PostgreSQL` implementation of [`ParkDatabase`]
//!
//! Transactions run at READ COMMITTED. Compound operations lock the target
//! cage row with `SELECT ... FOR UPDATE` before reading its aggregate, so two
//! writers on the same cage are serialized and the second one counts
//! residents only after the first one finished. Moves also lock the moving
//! dinosaur's row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row};
use tracing::{debug, info};
use uuid::Uuid;

use super::shared::enums::{species_check_list, str_to_cage_status, str_to_species};
use super::shared::transactions::{PostgresTransactionGuard, TransactionGuard};
use super::{ParkDatabase, ParkTransaction};
use crate::config::database::PoolConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Cage, CageId, CageStatus, Dinosaur, DinosaurFilter, DinosaurId, PlacementSnapshot,
};

const SELECT_CAGE: &str = r"
    SELECT c.id, c.capacity, c.status, c.created_at, c.updated_at, COUNT(d.id) AS occupancy
    FROM cages c
    LEFT JOIN dinosaurs d ON d.cage_id = c.id
    WHERE c.id = $1
    GROUP BY c.id, c.capacity, c.status, c.created_at, c.updated_at
";

const LIST_CAGES: &str = r"
    SELECT c.id, c.capacity, c.status, c.created_at, c.updated_at, COUNT(d.id) AS occupancy
    FROM cages c
    LEFT JOIN dinosaurs d ON d.cage_id = c.id
    WHERE ($1::TEXT IS NULL OR c.status = $1)
    GROUP BY c.id, c.capacity, c.status, c.created_at, c.updated_at
    ORDER BY c.created_at, c.id
";

const PLACEMENT_SNAPSHOT: &str = r"
    SELECT c.id, c.capacity, c.status, COUNT(d.id) AS occupancy, MIN(d.species) AS resident_species
    FROM cages c
    LEFT JOIN dinosaurs d ON d.cage_id = c.id
    WHERE c.id = $1
    GROUP BY c.id, c.capacity, c.status
";

const LIST_DINOSAURS: &str = r"
    SELECT id, name, species, cage_id, created_at, updated_at
    FROM dinosaurs
    WHERE ($1::UUID IS NULL OR cage_id = $1) AND ($2::TEXT IS NULL OR species = $2)
    ORDER BY created_at, id
";

/// `PostgreSQL` transaction as handed out by [`PostgresDatabase::begin`]
pub type PostgresTransaction = PostgresTransactionGuard<'static>;

/// `PostgreSQL` database implementation
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    /// Connect and bootstrap the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or the schema cannot be created
    pub async fn new(database_url: &str, pool_config: &PoolConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_config.max_connections)
            .acquire_timeout(pool_config.busy_timeout)
            .connect(database_url)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to connect to PostgreSQL: {e}")).with_source(e)
            })?;
        info!(
            max_connections = pool_config.max_connections,
            "PostgreSQL pool connected"
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ParkDatabase for PostgresDatabase {
    type Transaction = PostgresTransaction;

    async fn begin(&self) -> AppResult<Self::Transaction> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::database(format!("Failed to begin transaction: {e}")).with_source(e)
        })?;
        Ok(TransactionGuard::new(tx))
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS cages (
                id UUID PRIMARY KEY,
                capacity BIGINT NOT NULL CHECK (capacity > 0),
                status TEXT NOT NULL CHECK (status IN ('active', 'down')),
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create cages table: {e}")))?;

        let dinosaurs_table = format!(
            r"
            CREATE TABLE IF NOT EXISTS dinosaurs (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL CHECK (length(trim(name)) > 0),
                species TEXT NOT NULL CHECK (species IN ({})),
                cage_id UUID NOT NULL REFERENCES cages(id) ON DELETE RESTRICT,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            ",
            species_check_list()
        );
        sqlx::query(&dinosaurs_table)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to create dinosaurs table: {e}")))?;

        for index in [
            "CREATE INDEX IF NOT EXISTS idx_cages_status ON cages(status)",
            "CREATE INDEX IF NOT EXISTS idx_dinosaurs_cage_id ON dinosaurs(cage_id)",
            "CREATE INDEX IF NOT EXISTS idx_dinosaurs_species ON dinosaurs(species)",
        ] {
            sqlx::query(index)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to create index: {e}")))?;
        }

        debug!("PostgreSQL schema ready");
        Ok(())
    }

    async fn insert_cage(&self, cage: &Cage) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO cages (id, capacity, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(cage.id.as_uuid())
        .bind(i64::from(cage.capacity))
        .bind(cage.status.as_str())
        .bind(cage.created_at)
        .bind(cage.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert cage: {e}")).with_source(e))?;
        Ok(())
    }

    async fn get_cage(&self, cage_id: CageId) -> AppResult<Option<Cage>> {
        sqlx::query(SELECT_CAGE)
            .bind(cage_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get cage: {e}")).with_source(e))?
            .as_ref()
            .map(row_to_cage)
            .transpose()
    }

    async fn list_cages(&self, status: Option<CageStatus>) -> AppResult<Vec<Cage>> {
        sqlx::query(LIST_CAGES)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list cages: {e}")).with_source(e))?
            .iter()
            .map(row_to_cage)
            .collect()
    }

    async fn get_dinosaur(&self, dinosaur_id: DinosaurId) -> AppResult<Option<Dinosaur>> {
        sqlx::query(
            "SELECT id, name, species, cage_id, created_at, updated_at FROM dinosaurs WHERE id = $1",
        )
        .bind(dinosaur_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get dinosaur: {e}")).with_source(e))?
        .as_ref()
        .map(row_to_dinosaur)
        .transpose()
    }

    async fn list_dinosaurs(&self, filter: &DinosaurFilter) -> AppResult<Vec<Dinosaur>> {
        sqlx::query(LIST_DINOSAURS)
            .bind(filter.cage_id.map(|id| id.as_uuid()))
            .bind(filter.species.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to list dinosaurs: {e}")).with_source(e)
            })?
            .iter()
            .map(row_to_dinosaur)
            .collect()
    }

    async fn delete_dinosaur(&self, dinosaur_id: DinosaurId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM dinosaurs WHERE id = $1")
            .bind(dinosaur_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to delete dinosaur: {e}")).with_source(e)
            })?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ParkTransaction for PostgresTransaction {
    async fn lock_cage(&mut self, cage_id: CageId) -> AppResult<()> {
        sqlx::query("SELECT id FROM cages WHERE id = $1 FOR UPDATE")
            .bind(cage_id.as_uuid())
            .fetch_optional(self.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to lock cage: {e}")).with_source(e))?;
        Ok(())
    }

    async fn cage_aggregate(&mut self, cage_id: CageId) -> AppResult<Option<Cage>> {
        sqlx::query(SELECT_CAGE)
            .bind(cage_id.as_uuid())
            .fetch_optional(self.executor()?)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to read cage aggregate: {e}")).with_source(e)
            })?
            .as_ref()
            .map(row_to_cage)
            .transpose()
    }

    async fn placement_snapshot(&mut self, cage_id: CageId) -> AppResult<Option<PlacementSnapshot>> {
        sqlx::query(PLACEMENT_SNAPSHOT)
            .bind(cage_id.as_uuid())
            .fetch_optional(self.executor()?)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to read placement snapshot: {e}"))
                    .with_source(e)
            })?
            .as_ref()
            .map(row_to_snapshot)
            .transpose()
    }

    async fn update_cage_status(
        &mut self,
        cage_id: CageId,
        status: CageStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query("UPDATE cages SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(status.as_str())
            .bind(updated_at)
            .bind(cage_id.as_uuid())
            .execute(self.executor()?)
            .await
            .map_err(|e| {
                AppError::database(format!("Failed to update cage status: {e}")).with_source(e)
            })?;
        Ok(result.rows_affected())
    }

    async fn delete_cage(&mut self, cage_id: CageId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM cages WHERE id = $1")
            .bind(cage_id.as_uuid())
            .execute(self.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete cage: {e}")).with_source(e))?;
        Ok(result.rows_affected())
    }

    async fn lock_dinosaur(&mut self, dinosaur_id: DinosaurId) -> AppResult<Option<Dinosaur>> {
        sqlx::query(
            r"
            SELECT id, name, species, cage_id, created_at, updated_at
            FROM dinosaurs
            WHERE id = $1
            FOR UPDATE
            ",
        )
        .bind(dinosaur_id.as_uuid())
        .fetch_optional(self.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to lock dinosaur: {e}")).with_source(e))?
        .as_ref()
        .map(row_to_dinosaur)
        .transpose()
    }

    async fn insert_dinosaur(&mut self, dinosaur: &Dinosaur) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO dinosaurs (id, name, species, cage_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(dinosaur.id.as_uuid())
        .bind(&dinosaur.name)
        .bind(dinosaur.species.as_str())
        .bind(dinosaur.cage_id.as_uuid())
        .bind(dinosaur.created_at)
        .bind(dinosaur.updated_at)
        .execute(self.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert dinosaur: {e}")).with_source(e))?;
        Ok(())
    }

    async fn update_dinosaur_cage(
        &mut self,
        dinosaur_id: DinosaurId,
        cage_id: CageId,
        updated_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE dinosaurs SET cage_id = $1, updated_at = $2 WHERE id = $3")
                .bind(cage_id.as_uuid())
                .bind(updated_at)
                .bind(dinosaur_id.as_uuid())
                .execute(self.executor()?)
                .await
                .map_err(|e| {
                    AppError::database(format!("Failed to move dinosaur: {e}")).with_source(e)
                })?;
        Ok(result.rows_affected())
    }

    async fn commit(self) -> AppResult<()> {
        TransactionGuard::commit(self).await
    }

    async fn rollback(self) -> AppResult<()> {
        TransactionGuard::rollback(self).await
    }
}

// ================================
// Row mapping
// ================================

fn column<'r, T>(row: &'r PgRow, name: &str) -> AppResult<T>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(name)
        .map_err(|e| AppError::database(format!("Failed to get column '{name}': {e}")))
}

fn count(name: &str, value: i64) -> AppResult<u32> {
    u32::try_from(value)
        .map_err(|_| AppError::database(format!("Column '{name}' out of range: {value}")))
}

fn row_to_cage(row: &PgRow) -> AppResult<Cage> {
    Ok(Cage {
        id: CageId::from_uuid(column::<Uuid>(row, "id")?),
        capacity: count("capacity", column(row, "capacity")?)?,
        status: str_to_cage_status(&column::<String>(row, "status")?)?,
        occupancy: count("occupancy", column(row, "occupancy")?)?,
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}

fn row_to_snapshot(row: &PgRow) -> AppResult<PlacementSnapshot> {
    let resident_species = column::<Option<String>>(row, "resident_species")?
        .as_deref()
        .map(str_to_species)
        .transpose()?;
    Ok(PlacementSnapshot {
        cage_id: CageId::from_uuid(column::<Uuid>(row, "id")?),
        capacity: count("capacity", column(row, "capacity")?)?,
        status: str_to_cage_status(&column::<String>(row, "status")?)?,
        occupancy: count("occupancy", column(row, "occupancy")?)?,
        resident_species,
    })
}

fn row_to_dinosaur(row: &PgRow) -> AppResult<Dinosaur> {
    Ok(Dinosaur {
        id: DinosaurId::from_uuid(column::<Uuid>(row, "id")?),
        name: column(row, "name")?,
        species: str_to_species(&column::<String>(row, "species")?)?,
        cage_id: CageId::from_uuid(column::<Uuid>(row, "cage_id")?),
        created_at: column(row, "created_at")?,
        updated_at: column(row, "updated_at")?,
    })
}
