use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nd_core::{Error, IngestionReport};
use nd_scrapers::SourceSummary;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ScrapeQuery {
    pub limit: Option<usize>,
}

/// Job errors as HTTP responses: an unknown source is the caller's fault,
/// everything else is reported as a failed scrape.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::UnsupportedSource(source) => {
                warn!(%source, "Rejected scrape request");
                (StatusCode::BAD_REQUEST, format!("Unsupported news source: {}", source))
            }
            e => {
                error!(error = %e, "Scraping failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Scraping failed".to_string())
            }
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub async fn scrape(
    State(state): State<Arc<AppState>>,
    Path((source, category)): Path<(String, String)>,
    Query(query): Query<ScrapeQuery>,
) -> Result<Json<IngestionReport>, ApiError> {
    let limit = query.limit.unwrap_or(state.default_limit);
    info!(%source, %category, limit, "🚀 Scrape requested");

    let report = state.manager.run(&source, &category, Some(limit)).await?;
    Ok(Json(report))
}

pub async fn list_sources(State(state): State<Arc<AppState>>) -> Json<Vec<SourceSummary>> {
    Json(state.manager.sources())
}

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.manager.storage().count().await {
        Ok(articles) => Json(json!({ "status": "ok", "articles": articles })).into_response(),
        Err(e) => {
            error!(error = %e, "Storage health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unavailable" }))).into_response()
        }
    }
}
