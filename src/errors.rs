use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use std::fmt;

/// A single field-level validation failure.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Validation(Vec<FieldError>),
    /// Illegal state transition; message names the current status.
    State(String),
    NotFound,
    RateLimited {
        retry_after: u64,
    },
    Session(String),
    AuthRequired,
    Hash(String),
    Storage(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Validation(errs) => {
                let msgs: Vec<&str> = errs.iter().map(|e| e.message.as_str()).collect();
                write!(f, "Validation failed: {}", msgs.join("; "))
            }
            AppError::State(msg) => write!(f, "{msg}"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::RateLimited { retry_after } => {
                write!(f, "Rate limit exceeded, retry after {retry_after}s")
            }
            AppError::Session(msg) => write!(f, "Session error: {msg}"),
            AppError::AuthRequired => write!(f, "Authentication required"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Storage(e) => write!(f, "Storage error: {e}"),
        }
    }
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Db(_) => "DATABASE_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::State(_) => "INVALID_STATE",
            AppError::NotFound => "NOT_FOUND",
            AppError::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            AppError::Session(_) => "INVALID_SESSION",
            AppError::AuthRequired => "AUTH_REQUIRED",
            AppError::Hash(_) | AppError::Storage(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::State(_) => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Session(_) | AppError::AuthRequired => StatusCode::UNAUTHORIZED,
            AppError::Db(_) | AppError::Hash(_) | AppError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Infrastructure failures are logged server-side and returned generic.
        let body = match self {
            AppError::Db(_) | AppError::Hash(_) | AppError::Storage(_) => {
                log::error!("{self}");
                json!({
                    "success": false,
                    "error": { "code": self.code(), "message": "Internal server error" }
                })
            }
            AppError::Validation(errs) => json!({
                "success": false,
                "error": {
                    "code": self.code(),
                    "message": "Validation failed",
                    "details": errs,
                }
            }),
            AppError::RateLimited { retry_after } => json!({
                "success": false,
                "error": {
                    "code": self.code(),
                    "message": "Too many requests",
                    "retryAfter": retry_after,
                }
            }),
            _ => json!({
                "success": false,
                "error": { "code": self.code(), "message": self.to_string() }
            }),
        };

        HttpResponse::build(status).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound,
            other => AppError::Db(other),
        }
    }
}
