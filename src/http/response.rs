//! Error responses.
//!
//! # Responsibilities
//! - Map pipeline, validation and extractor failures to status codes
//! - Render every error as `{"detail": "..."}`
//!
//! # Design Decisions
//! - Only caller-safe messages reach the body; causes stay in the logs
//! - Schema problems (unparseable JSON, wrong content type, missing fields,
//!   text limits) are 422 and never reach the pipeline, so they are not
//!   counted as translate errors
//! - An oversized body keeps its 413

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::{RequestValidationError, TranslateError};

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error(transparent)]
    Validation(#[from] RequestValidationError),

    #[error("{}", .0.body_text())]
    Rejection(#[from] JsonRejection),

    /// Readiness probe failure, carries the full detail message.
    #[error("{0}")]
    NotReady(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Translate(err) => err.status(),
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejection(rejection) => match rejection {
                // Covers an oversized body (413) as well as read failures.
                JsonRejection::BytesRejection(bytes) => bytes.status(),
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            },
            ApiError::NotReady(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
