use crate::executor::ExecutionError;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Request-terminal failures, each mapped to a status code and a short
/// plain-text body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Invalid JSON payload")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("Sort execution failed")]
    Execution(#[from] ExecutionError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MethodNotAllowed => (
                self.status(),
                [(header::ALLOW, "POST")],
                self.to_string(),
            )
                .into_response(),
            _ => (self.status(), self.to_string()).into_response(),
        }
    }
}
