//! Shared helpers for storage unit tests.

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use crate::models::{CrawlInput, CrawlJob, CrawlStatus, NewPage};

use super::{run_migrations, Repository};

/// Creates a repository over an in-memory database with migrations
/// applied. A single connection keeps every query on the same in-memory
/// database.
pub(crate) async fn create_test_repository() -> Repository {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool).await.expect("Failed to run migrations");
    Repository::new(pool)
}

pub(crate) fn create_test_job(start_url: &str, max_depth: u32, max_pages: u32) -> CrawlJob {
    let now = Utc::now();
    CrawlJob {
        id: Uuid::new_v4().to_string(),
        input: CrawlInput {
            start_url: start_url.to_string(),
            max_depth,
            max_pages,
            same_domain_only: true,
            request_delay_ms: 0,
        },
        status: CrawlStatus::Pending,
        pages_crawled: 0,
        error: String::new(),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn create_test_page(job_id: &str, url: &str, title: &str) -> NewPage {
    NewPage {
        job_id: job_id.to_string(),
        url: url.to_string(),
        title: title.to_string(),
        html: format!("<html><title>{title}</title></html>"),
        text_content: title.to_string(),
        fetched_at: Utc::now(),
    }
}
