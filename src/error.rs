// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { message, field_errors } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "VALIDATION_ERROR"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            _ => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(
        message: impl Into<String>,
        field_errors: Option<HashMap<String, String>>,
    ) -> Self {
        ApiError::ValidationError { message: message.into(), field_errors }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        use crate::database::manager::DatabaseError;
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Duplicate(msg) => ApiError::conflict(msg),
            DatabaseError::ConfigMissing(what) => {
                tracing::error!("Missing configuration: {}", what);
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            DatabaseError::QueryError(msg) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database query error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("Database error occurred")
            }
        }
    }
}

impl From<crate::roll::transfer::TransferError> for ApiError {
    fn from(err: crate::roll::transfer::TransferError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<crate::roll::archive::ArchiveError> for ApiError {
    fn from(err: crate::roll::archive::ArchiveError) -> Self {
        use crate::roll::archive::ArchiveError;
        match err {
            ArchiveError::NotAdmin | ArchiveError::WrongSchool => {
                ApiError::forbidden(err.to_string())
            }
            ArchiveError::SelfArchive => ApiError::bad_request(err.to_string()),
            ArchiveError::AlreadyArchived | ArchiveError::NotArchived => {
                ApiError::conflict(err.to_string())
            }
        }
    }
}

impl From<crate::services::LedgerError> for ApiError {
    fn from(err: crate::services::LedgerError) -> Self {
        match err {
            crate::services::LedgerError::Database(e) => e.into(),
        }
    }
}

impl From<crate::services::LifecycleError> for ApiError {
    fn from(err: crate::services::LifecycleError) -> Self {
        use crate::services::LifecycleError;
        match err {
            LifecycleError::StaffNotFound(_) | LifecycleError::AdminRecordMissing => {
                ApiError::not_found(err.to_string())
            }
            LifecycleError::NothingToUndo => ApiError::not_found(err.to_string()),
            LifecycleError::Transfer(e) => e.into(),
            LifecycleError::Archive(e) => e.into(),
            LifecycleError::Database(e) => e.into(),
        }
    }
}

impl From<crate::services::RosterError> for ApiError {
    fn from(err: crate::services::RosterError) -> Self {
        use crate::services::RosterError;
        match err {
            RosterError::StaffNotFound(_) => ApiError::not_found(err.to_string()),
            RosterError::Database(e) => e.into(),
        }
    }
}

impl From<crate::services::AccountError> for ApiError {
    fn from(err: crate::services::AccountError) -> Self {
        use crate::services::AccountError;
        match err {
            AccountError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            AccountError::NotAuthorised | AccountError::Archived => {
                ApiError::forbidden(err.to_string())
            }
            AccountError::InvalidStaffDetails => ApiError::validation_error(err.to_string(), None),
            AccountError::DuplicateAccount => ApiError::conflict(err.to_string()),
            AccountError::Hash(e) => {
                tracing::error!("bcrypt error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            AccountError::Jwt(e) => {
                tracing::error!("JWT error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            AccountError::Database(e) => e.into(),
        }
    }
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(err: crate::storage::StorageError) -> Self {
        use crate::storage::StorageError;
        match err {
            StorageError::TooLarge { .. } => ApiError::validation_error(err.to_string(), None),
            StorageError::Io(e) => {
                tracing::error!("Image storage I/O error: {}", e);
                ApiError::internal_server_error("Failed to store image")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
