//! Crawl job handlers: submission and lookups.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::error_handling::StorageError;
use crate::models::CrawlInput;
use crate::server::types::AppState;
use crate::service::SubmitError;

/// POST /crawl — submit a crawl job. Returns 201 with the job, which is
/// already RUNNING; the crawl proceeds in the background.
pub async fn submit_crawl_handler(
    State(state): State<AppState>,
    Json(input): Json<CrawlInput>,
) -> Response {
    match state.service.submit(input).await {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(SubmitError::InvalidInput(message)) => {
            (StatusCode::BAD_REQUEST, message).into_response()
        }
        Err(SubmitError::Storage(e)) => {
            log::error!("Failed to submit crawl: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

/// GET /crawl/{id} — fetch a job by id.
pub async fn get_job_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.service.get_job(&id).await {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(StorageError::JobNotFound) => {
            (StatusCode::NOT_FOUND, "job not found").into_response()
        }
        Err(e) => {
            log::error!("Failed to get job {}: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

/// GET /crawl/{id}/pages — pages persisted for a job.
pub async fn get_pages_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.service.get_pages_by_job_id(&id).await {
        Ok(pages) => (StatusCode::OK, Json(pages)).into_response(),
        Err(StorageError::JobNotFound) => {
            (StatusCode::NOT_FOUND, "job not found").into_response()
        }
        Err(e) => {
            log::error!("Failed to get pages for job {}: {}", id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
