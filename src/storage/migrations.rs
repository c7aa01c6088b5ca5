//! Database migration management.
//!
//! Migrations are embedded into the binary at compile time via
//! `sqlx::migrate!`, so a distributed binary never depends on the
//! migrations directory being present on disk. Safe to run repeatedly.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;

use crate::error_handling::StorageError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Applies any pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| StorageError::SqlError(e.into()))?;
    Ok(())
}
