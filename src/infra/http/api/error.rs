use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;

use crate::application::error::{ErrorReport, QueryError};
use crate::infra::upstream::UpstreamError;

/// Error envelope for every data endpoint.
#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(error: QueryError) -> Self {
        match error {
            QueryError::MissingQueryId { .. } => Self::new(
                StatusCode::BAD_REQUEST,
                "Missing query id",
                error.to_string(),
            ),
            QueryError::CredentialMissing => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upstream credential not configured",
                error.to_string(),
            ),
            QueryError::Upstream(UpstreamError::NotFound { message }) => {
                Self::new(StatusCode::NOT_FOUND, "Not found", message)
            }
            QueryError::Upstream(UpstreamError::Timeout) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upstream timeout",
                "the upstream request exceeded its time bound",
            ),
            QueryError::Upstream(err) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upstream request failed",
                err.to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.error.to_string(),
            message: self.message.clone(),
            timestamp: OffsetDateTime::now_utc(),
        };
        let mut response = (self.status, Json(body)).into_response();
        // Attach a structured report so shared logging middleware can emit
        // rich diagnostics.
        ErrorReport::from_message(
            "infra::http::api",
            self.status,
            format!("{}: {}", self.error, self.message),
        )
        .attach(&mut response);
        response
    }
}
