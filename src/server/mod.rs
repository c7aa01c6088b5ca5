//! HTTP API for submitting crawls and querying the index.
//!
//! Routes:
//! - `POST /crawl` — submit a crawl job (201 + job)
//! - `GET /crawl/{id}` — job status (404 if unknown)
//! - `GET /crawl/{id}/pages` — pages persisted for a job
//! - `POST /reindex` — rebuild the index from the page table
//! - `GET /search?q=...` — ranked search over the live index

mod handlers;
mod types;

use axum::routing::{get, post};
use axum::Router;

use handlers::{
    get_job_handler, get_pages_handler, reindex_handler, search_handler, submit_crawl_handler,
};
pub use types::AppState;

/// Builds the API router. Separated from `start_server` so tests can
/// drive the router directly.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/crawl", post(submit_crawl_handler))
        .route("/crawl/{id}", get(get_job_handler))
        .route("/crawl/{id}/pages", get(get_pages_handler))
        .route("/reindex", post(reindex_handler))
        .route("/search", get(search_handler))
        .with_state(state)
}

/// Binds the listener and serves the API until the process exits.
pub async fn start_server(port: u16, state: AppState) -> Result<(), anyhow::Error> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to port {}: {}", port, e))?;

    log::info!("Server listening on http://0.0.0.0:{}/", port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
