// Shared test helpers: an in-memory repository, a full service stack, and
// a local stub site serving canned HTML.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse};
use axum::Router;
use sqlx::sqlite::SqlitePoolOptions;

use crawl_search::crawl::{Engine, PageBudget, PageSink};
use crawl_search::initialization::init_client;
use crawl_search::models::{CrawlInput, CrawlJob, CrawlStatus};
use crawl_search::search::Index;
use crawl_search::service::{CrawlService, IndexingWriter, JobRepository, PageRepository};
use crawl_search::storage::{run_migrations, Repository};

/// Creates a repository over an in-memory database with migrations
/// applied. A single connection keeps every query on the same in-memory
/// database.
pub async fn create_test_repository() -> Repository {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool).await.expect("Failed to run migrations");
    Repository::new(pool)
}

/// Wires the full stack (engine + indexing writer + service) over the
/// given repository and index, the same way `main` does.
pub fn build_service(
    repository: Arc<Repository>,
    index: Arc<Index>,
    workers: usize,
) -> Arc<CrawlService> {
    let writer = Arc::new(IndexingWriter::new(
        Arc::clone(&repository) as Arc<dyn PageRepository>,
        index,
    ));
    let engine = Arc::new(Engine::new(
        workers,
        init_client().expect("Failed to build HTTP client"),
        Arc::clone(&repository) as Arc<dyn PageBudget>,
        writer as Arc<dyn PageSink>,
    ));
    Arc::new(CrawlService::new(
        Arc::clone(&repository) as Arc<dyn JobRepository>,
        repository as Arc<dyn PageRepository>,
        engine,
    ))
}

/// A local site serving canned HTML bodies by path, for exercising the
/// crawler without real network access.
pub struct StubSite {
    pub base_url: String,
}

impl StubSite {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Binds an ephemeral localhost port and serves `pages` (path -> HTML).
/// Unknown paths return 404.
pub async fn serve_stub_site(pages: HashMap<String, String>) -> StubSite {
    let pages: Arc<HashMap<String, String>> = Arc::new(pages);
    let app = Router::new().fallback(move |uri: Uri| {
        let pages = Arc::clone(&pages);
        async move {
            match pages.get(uri.path()) {
                Some(body) => Html(body.clone()).into_response(),
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub site");
    let addr = listener.local_addr().expect("stub site address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    StubSite {
        base_url: format!("http://{}", addr),
    }
}

pub fn crawl_input(start_url: &str, max_depth: u32, max_pages: u32) -> CrawlInput {
    CrawlInput {
        start_url: start_url.to_string(),
        max_depth,
        max_pages,
        same_domain_only: true,
        request_delay_ms: 0,
    }
}

/// Polls the service until the job leaves RUNNING, panicking after ~30s.
pub async fn wait_for_terminal(service: &CrawlService, id: &str) -> CrawlJob {
    for _ in 0..600 {
        let job = service.get_job(id).await.expect("job lookup");
        if matches!(job.status, CrawlStatus::Completed | CrawlStatus::Failed) {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("job {id} never reached a terminal status");
}
