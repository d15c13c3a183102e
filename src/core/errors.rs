use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("retrieval failed: {0}")]
    Retrieval(String),
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, stage) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "request"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "request"),
            ApiError::Retrieval(_) => (StatusCode::BAD_GATEWAY, "retrieval"),
            ApiError::Generation(_) => (StatusCode::BAD_GATEWAY, "generation"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        let body = Json(json!({ "error": self.to_string(), "stage": stage }));
        (status, body).into_response()
    }
}
