//! HTTP-facing error type.
//!
//! Every failure leaves the service as a JSON body with a human-readable
//! `error` string; the status code is the only machine-readable signal.

use crate::evaluation::EvaluationError;
use crate::lokalise::LokaliseError;
use crate::translation::{DispatchError, FailedTranslation};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub const INVALID_JSON: &str = "Invalid JSON";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not valid JSON or the wrong method was used (400)
    #[error("{0}")]
    MalformedRequest(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    NotFound(String),

    /// A required field is missing or empty (400)
    #[error("{0}")]
    Validation(String),

    /// Non-2xx from an upstream API; the status is mirrored to the caller
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Translation to {} failed: {}", .0.language_iso, .0.error)]
    TranslationFailed(FailedTranslation),

    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    pub fn invalid_json() -> Self {
        ApiError::MalformedRequest(INVALID_JSON.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::TranslationFailed(_) | ApiError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::TranslationFailed(failed) => (status, Json(failed)).into_response(),
            other => (
                status,
                Json(ErrorResponse {
                    error: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::KeyNotFound | DispatchError::NoSourceText => {
                ApiError::NotFound(err.to_string())
            }
            DispatchError::LanguageFailed(failed) => ApiError::TranslationFailed(failed),
        }
    }
}

/// Scoring refuses the batch (wrong count, nothing to score): reported as a 500
impl From<EvaluationError> for ApiError {
    fn from(err: EvaluationError) -> Self {
        error!("Evaluation failed: {}", err);
        ApiError::Unexpected(err.to_string())
    }
}

/// Map a Lokalise failure: upstream statuses pass through, everything else is a 500
impl From<LokaliseError> for ApiError {
    fn from(err: LokaliseError) -> Self {
        error!("{}", err);
        match err.status() {
            Some(status) => ApiError::Upstream {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ApiError::Unexpected(err.to_string()),
        }
    }
}
