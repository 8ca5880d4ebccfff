//! Error responses for the HTTP API
//!
//! Every failure is rendered as `{"detail": "<message>"}` with a status code
//! chosen by the variant.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use orchestrator_core::LifecycleError;

/// Errors returned by the HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body failed validation
    #[error("{0}")]
    Validation(String),

    /// The request body or query string could not be parsed
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// The lifecycle operation failed
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The requested resource does not exist
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Lifecycle(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<common::Error> for ApiError {
    fn from(err: common::Error) -> Self {
        if err.is_invalid_argument() {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Lifecycle(LifecycleError::Store(err))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Lifecycle(LifecycleError::Store(ref err)) = self {
            error!("Model store failure: {}", err);
        }

        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
