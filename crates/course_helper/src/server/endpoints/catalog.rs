use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::catalog::{CatalogError, CatalogQuery, RawCatalogParams};
use crate::server::types::ApiErrorType;
use crate::types::AppState;

fn catalog_error_to_response(message: &str, error: CatalogError) -> Response {
    ApiErrorType::from((
        StatusCode::INTERNAL_SERVER_ERROR,
        message,
        Some(error.to_string()),
    ))
    .into_response()
}

/// GET /api/course
/// Returns one page of courses matching `q`, sorted by code
pub async fn get_courses(
    State(s): State<Arc<AppState>>,
    Query(params): Query<RawCatalogParams>,
) -> Response {
    let query = CatalogQuery::from_raw(params);
    info!(
        "GET /api/course (q={:?}, page={}, limit={})",
        query.q, query.page, query.limit
    );

    match s.catalog.query(&query).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            error!("Failed to query catalog: {}", e);
            catalog_error_to_response("Catalog query failed", e)
        }
    }
}

/// GET /api/collection
/// Returns every course in the catalog
pub async fn get_collection(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /api/collection");

    match s.catalog.all().await {
        Ok(documents) => (StatusCode::OK, Json(json!({ "documents": documents }))).into_response(),
        Err(e) => {
            error!("Failed to fetch catalog collection: {}", e);
            catalog_error_to_response("Failed to fetch data", e)
        }
    }
}
