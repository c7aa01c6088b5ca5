//! SQLite-backed persistence for jobs and pages.
//!
//! The repository is the single owner of job and page state. The crawl
//! engine and the service layer consume it through the consumer-side
//! traits (`service::JobRepository`, `service::PageRepository`,
//! `crawl::PageBudget`); everything here is plain sqlx against the
//! schema in `migrations/`.

mod jobs;
mod migrations;
mod pages;
mod pool;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use migrations::run_migrations;
pub use pool::init_db_pool;

use sqlx::SqlitePool;

use crate::error_handling::StorageError;

/// Job and page repository over a SQLite pool.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Connects to `database_url`, creating the database if necessary,
    /// and applies migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = init_db_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool. Migrations are the caller's concern.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the underlying pool. Used on graceful shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
