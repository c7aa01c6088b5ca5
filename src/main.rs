use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use crawl_search::config::Opt;
use crawl_search::crawl::{Engine, PageBudget, PageSink};
use crawl_search::initialization::{init_client, init_logger_with};
use crawl_search::search::Index;
use crawl_search::server::{start_server, AppState};
use crawl_search::service::{CrawlService, IndexingWriter, JobRepository, PageRepository};
use crawl_search::storage::Repository;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; production can rely on real environment.
    dotenvy::dotenv().ok();

    let opt = Opt::parse();
    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let repository = Arc::new(
        Repository::connect(&database_url)
            .await
            .context("Failed to initialize database")?,
    );

    // Warm the index from everything crawled in previous runs.
    let index = Arc::new(Index::new());
    let documents = repository
        .list_pages_for_index()
        .await
        .context("Failed to list pages for index")?;
    index.build_from_documents(&documents);
    info!("Index built with {} documents", documents.len());

    let client = init_client().context("Failed to initialize HTTP client")?;
    let writer = Arc::new(IndexingWriter::new(
        Arc::clone(&repository) as Arc<dyn PageRepository>,
        Arc::clone(&index),
    ));
    let engine = Arc::new(Engine::new(
        opt.workers,
        client,
        Arc::clone(&repository) as Arc<dyn PageBudget>,
        writer as Arc<dyn PageSink>,
    ));
    let service = Arc::new(CrawlService::new(
        Arc::clone(&repository) as Arc<dyn JobRepository>,
        Arc::clone(&repository) as Arc<dyn PageRepository>,
        engine,
    ));

    let state = AppState {
        service,
        index,
        pages: Arc::clone(&repository) as Arc<dyn PageRepository>,
    };

    let result = start_server(opt.port, state).await;
    repository.close().await;
    result
}
