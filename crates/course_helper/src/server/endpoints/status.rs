use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// GET /health
/// Reports whether the catalog store is reachable, with its course count
pub async fn get_health(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /health");

    match s.catalog.count().await {
        Ok(courses) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "courses": courses })),
        )
            .into_response(),
        Err(e) => {
            error!("Health check failed: {}", e);
            ApiErrorType::from((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Catalog store unavailable",
                Some(e.to_string()),
            ))
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::course;
    use crate::catalog::{CatalogService, RetryPolicy};
    use crate::db::CatalogDbManager;
    use axum::body::to_bytes;
    use std::time::Duration;

    #[tokio::test]
    async fn test_health_reports_count() {
        let db = CatalogDbManager::open_in_memory().unwrap();
        db.upsert_courses(&[course("1", "A1", "課", "Course 1"), course("2", "A2", "課", "Course 2")])
            .unwrap();
        let state = Arc::new(AppState::new(CatalogService::new(
            Arc::new(db),
            RetryPolicy {
                max_retries: 0,
                delay: Duration::ZERO,
            },
        )));

        let response = get_health(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["courses"], 2);
    }
}
