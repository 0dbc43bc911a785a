//! Application error type and its HTTP mapping.
//!
//! Every failure surfaced to a client is an [`AppError`]. Responses always carry
//! `success: false` and a human-readable `error` message; internal details such
//! as SQL errors are logged and never serialized.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Error body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed target URL or custom code.
    #[error("{message}")]
    InvalidInput { message: String, details: Value },

    /// The requested custom code is already taken.
    #[error("{message}")]
    CodeConflict { message: String, details: Value },

    /// Every generated candidate collided with an existing code.
    #[error("{message}")]
    CodeGenerationExhausted { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Any persistence-layer failure.
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details,
        }
    }

    pub fn code_conflict(message: impl Into<String>, details: Value) -> Self {
        Self::CodeConflict {
            message: message.into(),
            details,
        }
    }

    pub fn generation_exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::CodeGenerationExhausted {
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

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details: Value::Null,
        }
    }

    /// HTTP status class for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            AppError::CodeConflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::CodeGenerationExhausted { .. } | AppError::StoreUnavailable { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the serializable error body.
    pub fn to_error_body(&self) -> ErrorBody {
        let (message, details) = match self {
            AppError::InvalidInput { message, details }
            | AppError::CodeConflict { message, details }
            | AppError::CodeGenerationExhausted { message, details }
            | AppError::NotFound { message, details }
            | AppError::StoreUnavailable { message, details } => (message, details),
        };

        ErrorBody {
            success: false,
            error: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_error_body())).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::code_conflict(
                "Short code already exists",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "Database error");
        AppError::store_unavailable("Database error")
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input".to_string());

        AppError::invalid_input(message, json!(errors))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::invalid_input("Invalid input", json!({ "reason": rejection.body_text() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::invalid_input("bad", Value::Null).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::code_conflict("taken", Value::Null).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::not_found("missing", Value::Null).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::generation_exhausted("exhausted", Value::Null).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::store_unavailable("down").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::invalid_input("Invalid URL format", json!({ "reason": "x" }));
        assert_eq!(err.to_string(), "Invalid URL format");
    }

    #[test]
    fn test_error_body_shape() {
        let body = AppError::code_conflict("Short code already exists", Value::Null).to_error_body();
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Short code already exists");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_error_body_keeps_details() {
        let body =
            AppError::invalid_input("Invalid input", json!({ "code": "a b" })).to_error_body();
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["details"]["code"], "a b");
    }

    #[test]
    fn test_row_not_found_maps_to_store_unavailable() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::StoreUnavailable { .. }));
        assert_eq!(err.to_string(), "Database error");
    }
}
