use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum TaskchiError {
    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl TaskchiError {
    /// Get HTTP status code for the error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TaskchiError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TaskchiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            TaskchiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            TaskchiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            TaskchiError::NotFound { .. } => StatusCode::NOT_FOUND,
            TaskchiError::Conflict { .. } => StatusCode::CONFLICT,
            TaskchiError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
            TaskchiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TaskchiError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for client identification
    pub fn error_code(&self) -> &'static str {
        match self {
            TaskchiError::Database { .. } => "DATABASE_ERROR",
            TaskchiError::AuthenticationFailed { .. } => "AUTHENTICATION_FAILED",
            TaskchiError::Forbidden { .. } => "FORBIDDEN",
            TaskchiError::ValidationError { .. } => "VALIDATION_ERROR",
            TaskchiError::NotFound { .. } => "NOT_FOUND",
            TaskchiError::Conflict { .. } => "CONFLICT",
            TaskchiError::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
            TaskchiError::Internal { .. } => "INTERNAL_ERROR",
            TaskchiError::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }
}

/// Convert error to HTTP response
impl IntoResponse for TaskchiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status_code, body).into_response()
    }
}

/// Application result type
pub type Result<T> = std::result::Result<T, TaskchiError>;

/// Convert from common error types
impl From<sea_orm::DbErr> for TaskchiError {
    fn from(err: sea_orm::DbErr) -> Self {
        TaskchiError::Database {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for TaskchiError {
    fn from(err: reqwest::Error) -> Self {
        TaskchiError::ExternalService {
            service: "HTTP".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TaskchiError {
    fn from(err: serde_json::Error) -> Self {
        TaskchiError::ValidationError {
            field: "json".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for TaskchiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let message = err
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let error_messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .unwrap_or(&std::borrow::Cow::Borrowed("invalid"))
                            .to_string()
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        TaskchiError::ValidationError {
            field: "request".to_string(),
            message,
        }
    }
}
