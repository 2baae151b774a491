//! Source listing handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reelhub_core::SourceDescriptor;
use serde::Serialize;

use super::handlers::error_response;
use super::middleware::AdultPermission;
use crate::state::AppState;

/// A source as shown to API callers. Endpoints stay private.
#[derive(Debug, Serialize)]
pub struct SourceResponse {
    pub code: String,
    pub name: String,
    pub enabled: bool,
    pub adult: bool,
}

impl From<&SourceDescriptor> for SourceResponse {
    fn from(source: &SourceDescriptor) -> Self {
        Self {
            code: source.code.clone(),
            name: source.name.clone(),
            enabled: source.enabled,
            adult: source.adult,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<SourceResponse>,
    pub total: usize,
}

/// GET /api/v1/sources
///
/// Enabled sources the caller may search, in configuration order.
pub async fn list_sources(
    State(state): State<Arc<AppState>>,
    AdultPermission(adult): AdultPermission,
) -> Json<SourcesResponse> {
    let sources: Vec<SourceResponse> = state
        .catalog()
        .eligible_sources(adult)
        .iter()
        .map(SourceResponse::from)
        .collect();

    Json(SourcesResponse {
        total: sources.len(),
        sources,
    })
}

/// GET /api/v1/sources/{code}
///
/// Adult sources are reported as missing to callers without adult access.
pub async fn get_source(
    State(state): State<Arc<AppState>>,
    AdultPermission(adult): AdultPermission,
    Path(code): Path<String>,
) -> Response {
    match state.catalog().source_by_code(&code) {
        Some(source) if adult || !source.adult => {
            Json(SourceResponse::from(source)).into_response()
        }
        _ => error_response(
            StatusCode::NOT_FOUND,
            format!("Source not found: {}", code),
        ),
    }
}
