use axum::{
    http::{header::CACHE_CONTROL, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};

use crate::catalog::ErrorBody;

/// An error response: `{error, details, timestamp}`, never cached.
#[derive(Debug, Clone)]
pub struct ApiErrorType {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, error, details): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.to_string(),
                details: details.unwrap_or_default(),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            },
        }
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, [(CACHE_CONTROL, "no-store")], Json(self.body)).into_response()
    }
}
