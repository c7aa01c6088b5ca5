//! Job persistence: creation, lookup, status transitions, and the atomic
//! page-budget gate.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::crawl::PageBudget;
use crate::error_handling::StorageError;
use crate::models::{CrawlInput, CrawlJob, CrawlStatus};
use crate::service::JobRepository;

use super::Repository;

fn job_from_row(row: &SqliteRow) -> Result<CrawlJob, StorageError> {
    let status_str: String = row.get("status");
    let status =
        CrawlStatus::parse(&status_str).ok_or(StorageError::UnknownStatus(status_str))?;
    let input_json: String = row.get("input");
    let input: CrawlInput = serde_json::from_str(&input_json)?;
    let pages_crawled: i64 = row.get("pages_crawled");

    Ok(CrawlJob {
        id: row.get("id"),
        input,
        status,
        pages_crawled: pages_crawled as u32,
        error: row.get::<Option<String>, _>("error").unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl Repository {
    pub async fn create_job(&self, job: &CrawlJob) -> Result<(), StorageError> {
        let input_json = serde_json::to_string(&job.input)?;
        sqlx::query(
            "INSERT INTO jobs (id, input, status, error, pages_crawled, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&job.id)
        .bind(input_json)
        .bind(job.status.as_str())
        .bind(if job.error.is_empty() {
            None
        } else {
            Some(job.error.as_str())
        })
        .bind(job.pages_crawled as i64)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_job(&self, id: &str) -> Result<CrawlJob, StorageError> {
        let row = sqlx::query(
            "SELECT id, input, status, error, pages_crawled, created_at, updated_at
             FROM jobs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::JobNotFound)?;
        job_from_row(&row)
    }

    pub async fn update_job_status(
        &self,
        id: &str,
        status: CrawlStatus,
        error_msg: &str,
    ) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE jobs SET status = ?, error = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(if error_msg.is_empty() {
                None
            } else {
                Some(error_msg)
            })
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::JobNotFound);
        }
        Ok(())
    }

    /// Admits one page iff `pages_crawled < max_pages`, incrementing the
    /// counter in the same statement. The single conditional UPDATE is
    /// atomic, which is what keeps the budget exact under concurrent
    /// workers.
    pub async fn try_increment_pages_crawled(
        &self,
        id: &str,
        max_pages: u32,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE jobs SET pages_crawled = pages_crawled + 1, updated_at = ?
             WHERE id = ? AND pages_crawled < ?",
        )
        .bind(Utc::now())
        .bind(id)
        .bind(max_pages as i64)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl JobRepository for Repository {
    async fn create_job(&self, job: &CrawlJob) -> Result<(), StorageError> {
        Repository::create_job(self, job).await
    }

    async fn get_job(&self, id: &str) -> Result<CrawlJob, StorageError> {
        Repository::get_job(self, id).await
    }

    async fn update_job_status(
        &self,
        id: &str,
        status: CrawlStatus,
        error_msg: &str,
    ) -> Result<(), StorageError> {
        Repository::update_job_status(self, id, status, error_msg).await
    }

    async fn try_increment_pages_crawled(
        &self,
        id: &str,
        max_pages: u32,
    ) -> Result<bool, StorageError> {
        Repository::try_increment_pages_crawled(self, id, max_pages).await
    }
}

#[async_trait]
impl PageBudget for Repository {
    async fn try_increment_pages_crawled(
        &self,
        job_id: &str,
        max_pages: u32,
    ) -> anyhow::Result<bool> {
        Ok(Repository::try_increment_pages_crawled(self, job_id, max_pages).await?)
    }
}
