use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use reelindex_core::ReelError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl AppError {
    fn new(status: StatusCode, msg: impl std::fmt::Display) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: msg.to_string(),
            },
        }
    }

    pub fn bad_request(msg: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{} not found", what))
    }

    pub fn internal(msg: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self.body)).into_response()
    }
}

impl From<ReelError> for AppError {
    fn from(err: ReelError) -> Self {
        if err.is_client_error() {
            AppError::bad_request(err)
        } else {
            tracing::error!(error = %err, "request failed");
            AppError::internal(err)
        }
    }
}
