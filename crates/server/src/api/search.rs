//! Search API handler.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reelhub_core::search::SourceFailure;
use reelhub_core::{MergedItem, SearchError, SearchQuery};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::handlers::error_response;
use super::middleware::AdultPermission;
use crate::state::AppState;

/// Non-standard status for a request the client abandoned.
const CLIENT_CLOSED_REQUEST: u16 = 499;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default, alias = "wd")]
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub code: i32,
    pub keyword: String,
    pub total: usize,
    pub duration_ms: u64,
    pub sources_queried: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources_failed: Vec<SourceFailure>,
    pub list: Vec<MergedItem>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/search?keyword=...
///
/// Fan the keyword out to every source the caller may use and return the
/// merged, ranked list. If the client goes away the handler future is
/// dropped and the guard cancels the outstanding source fetches.
pub async fn search(
    State(state): State<Arc<AppState>>,
    AdultPermission(adult): AdultPermission,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };
    let keyword = params.keyword.unwrap_or_default();
    let query = SearchQuery::new(keyword.trim(), adult);

    let cancel = state.shutdown_token().child_token();
    let _guard = cancel.clone().drop_guard();

    match state.search().search(&query, &cancel).await {
        Ok(outcome) => Json(SearchResponse {
            code: 0,
            keyword: query.keyword,
            total: outcome.items.len(),
            duration_ms: outcome.duration_ms,
            sources_queried: outcome.sources_queried,
            sources_failed: outcome.sources_failed,
            list: outcome.items,
        })
        .into_response(),
        Err(e @ SearchError::EmptyKeyword) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ SearchError::Cancelled) => {
            info!(keyword = %query.keyword, "Search abandoned");
            let status = StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
                .unwrap_or(StatusCode::SERVICE_UNAVAILABLE);
            error_response(status, e.to_string())
        }
    }
}
