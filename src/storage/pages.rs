//! Page persistence: URL-keyed upsert, per-job listing, and the feed
//! used to warm the search index at startup.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error_handling::StorageError;
use crate::models::{NewPage, Page};
use crate::search::Document;
use crate::service::PageRepository;

use super::Repository;

fn page_from_row(row: &SqliteRow) -> Page {
    Page {
        id: row.get("id"),
        job_id: row.get("job_id"),
        url: row.get("url"),
        title: row.get::<Option<String>, _>("title").unwrap_or_default(),
        html: row.get("html"),
        text_content: row.get("text_content"),
        fetched_at: row.get("fetched_at"),
    }
}

impl Repository {
    /// Inserts the page, or updates it in place if the URL was crawled
    /// before. Returns the saved row with its assigned id, which is what
    /// the index uses as the document id.
    pub async fn upsert_page(&self, page: &NewPage) -> Result<Page, StorageError> {
        let row = sqlx::query(
            "INSERT INTO pages (job_id, url, title, html, text_content, fetched_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(url) DO UPDATE SET
                 job_id = excluded.job_id,
                 title = excluded.title,
                 html = excluded.html,
                 text_content = excluded.text_content,
                 fetched_at = excluded.fetched_at
             RETURNING id, job_id, url, title, html, text_content, fetched_at",
        )
        .bind(&page.job_id)
        .bind(&page.url)
        .bind(if page.title.is_empty() {
            None
        } else {
            Some(page.title.as_str())
        })
        .bind(&page.html)
        .bind(&page.text_content)
        .bind(page.fetched_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(page_from_row(&row))
    }

    pub async fn get_pages_by_job_id(&self, job_id: &str) -> Result<Vec<Page>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, job_id, url, title, html, text_content, fetched_at
             FROM pages WHERE job_id = ? ORDER BY id",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(page_from_row).collect())
    }

    /// Streams every stored page into index documents
    /// (`title + " " + text_content`). Used at startup and by `/reindex`.
    pub async fn list_pages_for_index(&self) -> Result<Vec<Document>, StorageError> {
        let rows = sqlx::query("SELECT id, title, text_content FROM pages ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| {
                let title: Option<String> = row.get("title");
                let text_content: String = row.get("text_content");
                Document {
                    id: row.get("id"),
                    text: format!("{} {}", title.unwrap_or_default(), text_content),
                }
            })
            .collect())
    }
}

#[async_trait]
impl PageRepository for Repository {
    async fn upsert_page(&self, page: &NewPage) -> Result<Page, StorageError> {
        Repository::upsert_page(self, page).await
    }

    async fn get_pages_by_job_id(&self, job_id: &str) -> Result<Vec<Page>, StorageError> {
        Repository::get_pages_by_job_id(self, job_id).await
    }

    async fn list_pages_for_index(&self) -> Result<Vec<Document>, StorageError> {
        Repository::list_pages_for_index(self).await
    }
}
