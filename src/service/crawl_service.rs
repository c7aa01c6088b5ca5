//! Job orchestration: submission, status transitions, and the detached
//! background crawl.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

use crate::crawl::Engine;
use crate::error_handling::StorageError;
use crate::models::{CrawlInput, CrawlJob, CrawlStatus, NewPage, Page};
use crate::search::Document;

/// Job persistence as consumed by the service.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_job(&self, job: &CrawlJob) -> Result<(), StorageError>;
    async fn get_job(&self, id: &str) -> Result<CrawlJob, StorageError>;
    async fn update_job_status(
        &self,
        id: &str,
        status: CrawlStatus,
        error_msg: &str,
    ) -> Result<(), StorageError>;
    async fn try_increment_pages_crawled(
        &self,
        id: &str,
        max_pages: u32,
    ) -> Result<bool, StorageError>;
}

/// Page persistence as consumed by the service and the indexing writer.
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// Insert-or-update keyed on URL; returns the saved page with its
    /// assigned id.
    async fn upsert_page(&self, page: &NewPage) -> Result<Page, StorageError>;
    async fn get_pages_by_job_id(&self, job_id: &str) -> Result<Vec<Page>, StorageError>;
    /// Every stored page as an index document, for warming and rebuilds.
    async fn list_pages_for_index(&self) -> Result<Vec<Document>, StorageError>;
}

/// Errors surfaced synchronously from `submit`.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("invalid crawl input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Orchestrates crawl jobs: validates input, persists the job, launches
/// the engine on a detached background task, and records the terminal
/// status when the crawl finishes.
pub struct CrawlService {
    jobs: Arc<dyn JobRepository>,
    pages: Arc<dyn PageRepository>,
    engine: Arc<Engine>,
}

impl CrawlService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        pages: Arc<dyn PageRepository>,
        engine: Arc<Engine>,
    ) -> Self {
        Self {
            jobs,
            pages,
            engine,
        }
    }

    /// Creates a job for `input` and starts crawling in the background.
    ///
    /// The returned job is already RUNNING. The crawl itself runs on a
    /// spawned task with its own cancellation token — deliberately not
    /// the caller's request context, which ends when the HTTP response
    /// is written. The job transitions to COMPLETED or FAILED when the
    /// engine returns.
    pub async fn submit(&self, input: CrawlInput) -> Result<CrawlJob, SubmitError> {
        validate_input(&input)?;

        let now = Utc::now();
        let mut job = CrawlJob {
            id: Uuid::new_v4().to_string(),
            input,
            status: CrawlStatus::Pending,
            pages_crawled: 0,
            error: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.jobs.create_job(&job).await?;
        self.jobs
            .update_job_status(&job.id, CrawlStatus::Running, "")
            .await?;
        job.status = CrawlStatus::Running;

        info!("Submitted crawl {} for {}", job.id, job.input.start_url);

        let jobs = Arc::clone(&self.jobs);
        let engine = Arc::clone(&self.engine);
        let background_job = job.clone();
        tokio::spawn(async move {
            let result = engine
                .start(CancellationToken::new(), &background_job)
                .await;
            let (status, message) = match result {
                Ok(()) => (CrawlStatus::Completed, String::new()),
                Err(e) => (CrawlStatus::Failed, e.to_string()),
            };
            info!("Crawl {} finished: {}", background_job.id, status);
            if let Err(e) = jobs
                .update_job_status(&background_job.id, status, &message)
                .await
            {
                warn!(
                    "Failed to record terminal status for crawl {}: {}",
                    background_job.id, e
                );
            }
        });

        Ok(job)
    }

    pub async fn get_job(&self, id: &str) -> Result<CrawlJob, StorageError> {
        self.jobs.get_job(id).await
    }

    /// Pages stored for a job. Unknown job ids are a `JobNotFound`, not
    /// an empty list.
    pub async fn get_pages_by_job_id(&self, job_id: &str) -> Result<Vec<Page>, StorageError> {
        self.jobs.get_job(job_id).await?;
        self.pages.get_pages_by_job_id(job_id).await
    }
}

fn validate_input(input: &CrawlInput) -> Result<(), SubmitError> {
    if input.start_url.is_empty() {
        return Err(SubmitError::InvalidInput("StartURL is required".into()));
    }
    let url = Url::parse(&input.start_url)
        .map_err(|e| SubmitError::InvalidInput(format!("StartURL does not parse: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SubmitError::InvalidInput(format!(
            "StartURL must be http or https, got {}",
            url.scheme()
        )));
    }
    if input.max_pages < 1 {
        return Err(SubmitError::InvalidInput("MaxPages must be at least 1".into()));
    }
    Ok(())
}
