//! Search and reindex handlers.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

use crate::server::types::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: String,
}

/// GET /search?q=... — ranked results from the live index.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let results = state.index.search(&params.q);
    (StatusCode::OK, Json(results)).into_response()
}

/// POST /reindex — rebuild the index from every stored page.
pub async fn reindex_handler(State(state): State<AppState>) -> Response {
    match state.pages.list_pages_for_index().await {
        Ok(documents) => {
            state.index.build_from_documents(&documents);
            log::info!("Index rebuilt with {} documents", documents.len());
            (
                StatusCode::OK,
                Json(serde_json::json!({ "documents_indexed": documents.len() })),
            )
                .into_response()
        }
        Err(e) => {
            log::error!("Failed to list pages for reindex: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}
