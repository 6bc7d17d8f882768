//! Engine-facing error types (§7, §11).
//!
//! `FallbackEngine::process` never returns an error — every business
//! outcome, including a decline, is reflected in `TransactionResponse`.
//! These variants only ever surface from the admin endpoints, where they
//! map to HTTP status codes at the router boundary.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::resilience::UnknownProcessor;

/// Errors the HTTP layer can surface.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown processor: {0}")]
    UnknownProcessor(String),
    #[error("invalid inject-failures count")]
    InvalidInjectCount,
}

impl From<UnknownProcessor> for EngineError {
    fn from(value: UnknownProcessor) -> Self {
        Self::UnknownProcessor(value.0)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::UnknownProcessor(_) => StatusCode::NOT_FOUND,
            Self::InvalidInjectCount => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
