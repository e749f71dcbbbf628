// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Failure of a backing store call (attempt history, catalog or user lookups).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

/// Errors that abort an evaluation before a score is produced.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("No answers submitted")]
    EmptySubmission,

    #[error("Quiz not found with ID: {0}")]
    QuizNotFound(i64),

    #[error("Question not found with ID: {0}")]
    QuestionNotFound(i64),

    #[error("lookup failed: {0}")]
    Store(#[from] StoreError),
}

impl From<EvaluationError> for AppError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::EmptySubmission => AppError::BadRequest(err.to_string()),
            EvaluationError::QuizNotFound(_) | EvaluationError::QuestionNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            EvaluationError::Store(inner) => inner.into(),
        }
    }
}

/// Failure while writing attempt history.
///
/// Recording is best-effort: this error is logged at the request boundary
/// and never turned into an HTTP error.
#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("failed to fetch existing attempts: {0}")]
    Fetch(#[source] StoreError),

    #[error("failed to evict attempt {attempt_id}: {source}")]
    Evict {
        attempt_id: i64,
        #[source]
        source: StoreError,
    },

    #[error("failed to save attempt: {0}")]
    Save(#[source] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_errors_map_to_client_statuses() {
        let empty: AppError = EvaluationError::EmptySubmission.into();
        assert!(matches!(empty, AppError::BadRequest(_)));

        let missing: AppError = EvaluationError::QuestionNotFound(7).into();
        match missing {
            AppError::NotFound(msg) => assert_eq!(msg, "Question not found with ID: 7"),
            other => panic!("unexpected mapping: {other:?}"),
        }

        let store: AppError =
            EvaluationError::Store(StoreError::Unavailable("down".into())).into();
        assert!(matches!(store, AppError::InternalServerError(_)));
    }
}
