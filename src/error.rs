use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    BadRequest(String),
    Conflict(String),
    /// A registry invariant (headquarters uniqueness, operating hours) would break.
    InvariantViolation { field: &'static str, message: String },
    /// A unique key (code, company + name, ...) is already taken.
    DuplicateKey { field: &'static str, message: String },
    /// The audit trail for a mutation could not be written; the mutation is rolled back.
    AuditWrite(sqlx::Error),
    Internal(String),
    Database(sqlx::Error),
}

impl AppError {
    pub fn invariant(field: &'static str, message: impl Into<String>) -> Self {
        AppError::InvariantViolation {
            field,
            message: message.into(),
        }
    }

    pub fn duplicate(field: &'static str, message: impl Into<String>) -> Self {
        AppError::DuplicateKey {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            AppError::InvariantViolation { field, message } => {
                write!(f, "Invariant Violation on {field}: {message}")
            }
            AppError::DuplicateKey { field, message } => {
                write!(f, "Duplicate Key on {field}: {message}")
            }
            AppError::AuditWrite(err) => write!(f, "Audit Write Error: {err}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, field) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::InvariantViolation { field, message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message.clone(), Some(*field))
            }
            AppError::DuplicateKey { field, message } => {
                (StatusCode::CONFLICT, message.clone(), Some(*field))
            }
            AppError::AuditWrite(err) => {
                tracing::error!("Audit write failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = match field {
            Some(field) => json!({ "error": message, "field": field }),
            None => json!({ "error": message }),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}
