use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Response for an error
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: u16,
    pub status: String,
    pub error: String,
}

/// Typed failures surfaced by the document and chat services.
///
/// Registry and broadcast paths do not produce these; they are infallible
/// in normal operation and any panic there is a programming error.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(String),

    #[error("Document is locked by another user")]
    Locked,

    #[error("{0}")]
    Validation(String),

    #[error("Transient storage failure: {0}")]
    Transient(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Locked => StatusCode::LOCKED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: status.as_u16(),
            status: status.to_string(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
