use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing required fields: {0}")]
    MissingFields(String),
    #[error("Task ID already exists: {0}")]
    DuplicateTaskId(String),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Deadline has passed for task: {0}")]
    DeadlinePassed(String),
    #[error("Authentication failed: {0}")]
    AuthError(String),
    #[error("Persistence layer unavailable")]
    PersistenceUnavailable,
    #[error("Database error: {0}")]
    SqlxError(sqlx::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // Pool acquire timeout is the request-timeout boundary for all
            // persistence calls.
            sqlx::Error::PoolTimedOut => AppError::PersistenceUnavailable,
            other => AppError::SqlxError(other),
        }
    }
}

impl AppError {
    /// Remap a unique-constraint violation to a domain conflict; anything
    /// else stays a database error.
    pub fn or_conflict(err: sqlx::Error, conflict: AppError) -> AppError {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => conflict,
            _ => err.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::DuplicateEmail => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::MissingFields(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::DuplicateTaskId(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::TaskNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::DeadlinePassed(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::PersistenceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::SqlxError(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
