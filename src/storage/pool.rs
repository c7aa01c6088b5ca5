//! Database connection pool management.
//!
//! Initializes the SQLite connection pool from a `DATABASE_URL`-style
//! connection string, creating the database file if needed and enabling
//! WAL mode for concurrent access.

use std::str::FromStr;

use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error_handling::StorageError;

/// Initializes and returns a database connection pool.
///
/// `database_url` is a SQLite connection string such as
/// `sqlite:crawl_search.db` or `sqlite::memory:`. The database file is
/// created if it does not exist, and WAL mode is enabled for better
/// concurrent access.
pub async fn init_db_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(StorageError::SqlError)?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    // Enable WAL mode
    sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;

    info!("Connected to database");
    Ok(pool)
}
