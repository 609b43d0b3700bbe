//! API error types with IntoResponse
//!
//! Distinct failure kinds stay distinct internally (and in status
//! codes), but response bodies stay generic: the root cause of a
//! database failure is logged, never shipped to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request input failed domain validation (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Unique constraint hit, e.g. duplicate e-mail (409)
    Conflict { message: String },

    /// Referenced row does not exist (422)
    InvalidReference { message: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::Conflict { message } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": message
                }),
            ),
            Self::InvalidReference { message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": "invalid_reference",
                    "message": message
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return a generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::UniqueViolation { constraint } => Self::Conflict {
                message: format!("duplicate value for '{}'", constraint),
            },
            DbError::ForeignKeyViolation { constraint } => Self::InvalidReference {
                message: format!("reference violates '{}'", constraint),
            },
            // Values outside the CHECK sets are caught at parse time;
            // one reaching the datastore still maps to a client error.
            DbError::CheckViolation { constraint } => {
                tracing::warn!(%constraint, "check constraint rejected a write");
                Self::Validation(ValidationError::InvalidFormat {
                    field: "request",
                    reason: "value rejected by a datastore constraint",
                })
            }
            other => Self::Database(other),
        }
    }
}
