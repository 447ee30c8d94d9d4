use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use loadgen_common::LoadgenError;

/// Errors surfaced to HTTP callers. Domain violations map to 400, upstream
/// trouble to 502, everything else to 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] LoadgenError),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(LoadgenError::InputOutOfRange(_)) => StatusCode::BAD_REQUEST,
            ApiError::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(target: "api", "request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
