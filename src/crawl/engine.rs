//! The concurrent crawl engine.
//!
//! A fixed pool of workers drains a bounded work queue; every processed
//! page can discover new work, so termination rests on the queue's
//! active-task accounting (see `queue.rs`). Per-task failures are
//! counted and logged; the only fatal error is an unparseable seed URL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, warn};
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::QUEUE_CAPACITY;
use crate::error_handling::{CrawlError, CrawlStats, ErrorType, InfoType, WarningType};
use crate::models::{CrawlJob, NewPage, UrlTask};

use super::parser::parse_page;
use super::queue::WorkQueue;
use super::visited::VisitedSet;

/// Admission control for the shared page budget. The implementation must
/// check-and-increment atomically; the engine relies on that for the
/// `pages_crawled <= max_pages` invariant under concurrent workers.
#[async_trait]
pub trait PageBudget: Send + Sync {
    /// Admits one more page iff the job's counter is still below
    /// `max_pages`, incrementing it in the same atomic step.
    async fn try_increment_pages_crawled(
        &self,
        job_id: &str,
        max_pages: u32,
    ) -> anyhow::Result<bool>;
}

/// Destination for fetched pages. Implemented by the indexing writer,
/// which persists the page and feeds the live search index.
#[async_trait]
pub trait PageSink: Send + Sync {
    async fn create_page(&self, page: NewPage) -> anyhow::Result<()>;
}

/// The crawl engine. One instance serves the whole process; each
/// `start` call gets its own queue, visited set, and statistics.
pub struct Engine {
    worker_count: usize,
    client: reqwest::Client,
    budget: Arc<dyn PageBudget>,
    sink: Arc<dyn PageSink>,
}

/// State shared by the workers of a single crawl.
struct CrawlRun {
    client: reqwest::Client,
    budget: Arc<dyn PageBudget>,
    sink: Arc<dyn PageSink>,
    job: CrawlJob,
    allowed_host: String,
    queue: WorkQueue,
    visited: VisitedSet,
    stats: CrawlStats,
    cancel: CancellationToken,
}

impl Engine {
    /// Builds an engine with `worker_count` workers. The client should
    /// come from `initialization::init_client` (bounded timeout,
    /// browser-like User-Agent).
    pub fn new(
        worker_count: usize,
        client: reqwest::Client,
        budget: Arc<dyn PageBudget>,
        sink: Arc<dyn PageSink>,
    ) -> Self {
        Self {
            worker_count,
            client,
            budget,
            sink,
        }
    }

    /// Runs one crawl to completion.
    ///
    /// Seeds the queue with the start URL at depth 0, spawns the worker
    /// pool, and returns once every worker has exited. Fails fast only
    /// if the seed URL does not parse as an absolute URL with a host.
    pub async fn start(
        &self,
        cancel: CancellationToken,
        job: &CrawlJob,
    ) -> Result<(), CrawlError> {
        let seed = Url::parse(&job.input.start_url)?;
        let allowed_host = seed
            .host_str()
            .ok_or_else(|| CrawlError::StartUrlMissingHost(job.input.start_url.clone()))?
            .to_string();

        let run = Arc::new(CrawlRun {
            client: self.client.clone(),
            budget: Arc::clone(&self.budget),
            sink: Arc::clone(&self.sink),
            job: job.clone(),
            allowed_host,
            queue: WorkQueue::new(QUEUE_CAPACITY),
            visited: VisitedSet::new(),
            stats: CrawlStats::new(),
            cancel,
        });

        run.queue
            .push(UrlTask {
                url: job.input.start_url.clone(),
                depth: 0,
            })
            .await;

        let mut workers = FuturesUnordered::new();
        for _ in 0..self.worker_count {
            let run = Arc::clone(&run);
            workers.push(tokio::spawn(async move {
                while let Some(task) = run.queue.next_task().await {
                    run.process_task(task).await;
                }
            }));
        }
        while let Some(result) = workers.next().await {
            if let Err(e) = result {
                warn!("Crawl worker panicked: {}", e);
            }
        }

        run.stats.log_summary(&job.id);
        Ok(())
    }
}

impl CrawlRun {
    /// Processes one task and always accounts for it, whether it ran,
    /// was skipped, or failed. The final `task_done` is what lets the
    /// queue close when the last task finishes.
    async fn process_task(&self, task: UrlTask) {
        self.handle_task(&task).await;
        self.queue.task_done();
    }

    async fn handle_task(&self, task: &UrlTask) {
        if self.cancel.is_cancelled() {
            return;
        }

        if !self.visited.mark_if_not_visited(&task.url) {
            self.stats.increment_info(InfoType::SkippedVisited);
            debug!("Skipping already visited URL: {}", task.url);
            return;
        }

        if self.job.input.request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.job.input.request_delay_ms)).await;
        }

        debug!("Fetching [depth {}]: {}", task.depth, task.url);
        let response = match self.client.get(&task.url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch {}: {}", task.url, e);
                self.stats.increment_error(ErrorType::FetchError);
                return;
            }
        };

        if response.status() != StatusCode::OK {
            debug!("Non-200 response {} for {}", response.status(), task.url);
            self.stats.increment_error(ErrorType::NonOkStatus);
            return;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read body of {}: {}", task.url, e);
                self.stats.increment_error(ErrorType::BodyReadError);
                return;
            }
        };

        let admitted = match self
            .budget
            .try_increment_pages_crawled(&self.job.id, self.job.input.max_pages)
            .await
        {
            Ok(admitted) => admitted,
            Err(e) => {
                warn!("Page budget check failed for {}: {:#}", task.url, e);
                self.stats.increment_error(ErrorType::BudgetCheckError);
                return;
            }
        };
        if !admitted {
            debug!(
                "Page budget of {} reached, dropping {}",
                self.job.input.max_pages, task.url
            );
            self.stats.increment_info(InfoType::BudgetReached);
            return;
        }

        let parsed = match parse_page(&task.url, &body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Failed to parse {}: {}", task.url, e);
                self.stats.increment_error(ErrorType::ParseError);
                return;
            }
        };
        if parsed.title.is_empty() {
            self.stats.increment_warning(WarningType::MissingTitle);
        }

        let page = NewPage {
            job_id: self.job.id.clone(),
            url: task.url.clone(),
            title: parsed.title,
            html: body,
            text_content: parsed.text_content,
            fetched_at: Utc::now(),
        };
        if let Err(e) = self.sink.create_page(page).await {
            warn!("Failed to persist {}: {:#}", task.url, e);
            self.stats.increment_error(ErrorType::PersistError);
            return;
        }

        if task.depth >= self.job.input.max_depth {
            debug!("Max depth {} reached at {}", self.job.input.max_depth, task.url);
            return;
        }

        for link in &parsed.links {
            if self.cancel.is_cancelled() {
                return;
            }
            // Links arrive absolute from the parser; re-parse only to
            // read the host.
            let Ok(link_url) = Url::parse(link) else {
                continue;
            };
            if self.job.input.same_domain_only
                && link_url.host_str() != Some(self.allowed_host.as_str())
            {
                self.stats.increment_info(InfoType::SkippedExternalHost);
                debug!("Skipping external link: {}", link);
                continue;
            }
            if self.visited.contains(link) {
                continue;
            }
            if !self
                .queue
                .push(UrlTask {
                    url: link.clone(),
                    depth: task.depth + 1,
                })
                .await
            {
                return;
            }
        }
    }
}
