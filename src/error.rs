//! Application error type shared by every layer.
//!
//! Each variant carries a human-readable `message` and structured `details`
//! that are returned verbatim in API error bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload used in API responses and batch results.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    /// Malformed input, e.g. a URL that is not absolute.
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Duplicate URL at creation.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Illegal lifecycle transition on a link.
    #[error("{message}")]
    InvalidState { message: String, details: Value },

    /// Fetching or parsing the target page failed.
    #[error("{message}")]
    Scrape { message: String, details: Value },

    /// The summarization backend failed.
    #[error("{message}")]
    Summarize { message: String, details: Value },

    /// Repository I/O or (de)serialization failure.
    #[error("{message}")]
    Storage { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_state(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidState {
            message: message.into(),
            details,
        }
    }
    pub fn scrape(message: impl Into<String>, details: Value) -> Self {
        Self::Scrape {
            message: message.into(),
            details,
        }
    }
    pub fn summarize(message: impl Into<String>, details: Value) -> Self {
        Self::Summarize {
            message: message.into(),
            details,
        }
    }
    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code for this error category.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::InvalidState { .. } => "invalid_state",
            AppError::Scrape { .. } => "scrape_error",
            AppError::Summarize { .. } => "summarize_error",
            AppError::Storage { .. } => "storage_error",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } | AppError::InvalidState { .. } => StatusCode::CONFLICT,
            AppError::Scrape { .. } | AppError::Summarize { .. } => StatusCode::BAD_GATEWAY,
            AppError::Storage { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn details(&self) -> &Value {
        match self {
            AppError::Validation { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Conflict { details, .. }
            | AppError::InvalidState { details, .. }
            | AppError::Scrape { details, .. }
            | AppError::Summarize { details, .. }
            | AppError::Storage { details, .. }
            | AppError::Internal { details, .. } => details,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details: self.details().clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<String> = field_errors.keys().map(|k| k.to_string()).collect();
        fields.sort();
        AppError::bad_request(
            "Request validation failed",
            json!({ "fields": fields, "errors": errors.to_string() }),
        )
    }
}

pub fn map_io_error(e: std::io::Error) -> AppError {
    AppError::storage("Storage I/O error", json!({ "reason": e.to_string() }))
}

pub fn map_json_error(e: serde_json::Error) -> AppError {
    AppError::storage(
        "Failed to (de)serialize stored links",
        json!({ "reason": e.to_string() }),
    )
}
