//! Application error type and its HTTP mapping.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ErrorBody;

/// Result alias used across services.
pub type AppResult<T> = Result<T, AppError>;

/// Failure category, deciding the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is unusable.
    Client,
    /// Anything raised while talking to the database.
    Execution,
}

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// `query` was absent or empty on an endpoint that requires it.
    #[error("No query provided")]
    MissingQuery,

    /// Body was not a JSON request envelope.
    #[error("{0}")]
    InvalidBody(String),

    /// Connection, syntax, constraint or any other database failure.
    #[error("{0}")]
    Execution(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MissingQuery | AppError::InvalidBody(_) => ErrorKind::Client,
            AppError::Execution(_) => ErrorKind::Execution,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Client => StatusCode::BAD_REQUEST,
            ErrorKind::Execution => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // Server-side errors carry their own message; drop the driver's prefix.
            sqlx::Error::Database(db_err) => AppError::Execution(db_err.message().to_string()),
            other => AppError::Execution(other.to_string()),
        }
    }
}

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self.kind() {
            ErrorKind::Execution => tracing::warn!(error = %self, "query execution failed"),
            ErrorKind::Client => tracing::debug!(error = %self, "rejected request"),
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_missing_query_is_client_error() {
        let err = AppError::MissingQuery;
        assert_eq!(err.kind(), ErrorKind::Client);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No query provided");
    }

    #[test]
    fn test_driver_error_is_execution_error() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_error_renders_error_body() {
        let response = AppError::Execution("Table 'test.nope' doesn't exist".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Table 'test.nope' doesn't exist" }));
    }
}
