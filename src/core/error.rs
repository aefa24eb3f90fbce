use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::cache::CacheError;
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache store error: {0}")]
    CacheStore(#[from] CacheError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored list-valued setting could not be parsed
    #[error("Malformed setting '{key}': {reason}")]
    MalformedSetting { key: String, reason: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::CacheStore(ref e) => {
                tracing::error!("Cache store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Cache error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::MalformedSetting { ref key, ref reason } => {
                tracing::error!("Malformed setting '{}': {}", key, reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Setting '{}' is malformed", key),
                    None,
                )
            }
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Map unique/foreign-key violations to caller-facing errors
pub fn handle_db_error(e: sqlx::Error, unique_message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // PostgreSQL unique_violation
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Validation(unique_message.to_string());
        }

        // PostgreSQL foreign_key_violation
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
            return AppError::BadRequest("Referenced record does not exist".to_string());
        }
    }

    tracing::error!("Database error: {:?}", e);
    AppError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_setting_maps_to_server_error() {
        let response = AppError::MalformedSetting {
            key: "home_custom_links".to_string(),
            reason: "expected value".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = AppError::Validation("Tag name is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_cache_error_converts_and_hides_details() {
        fn flush() -> Result<()> {
            Err(CacheError::Backend("connection refused".to_string()))?;
            Ok(())
        }

        let err = flush().unwrap_err();
        assert!(matches!(err, AppError::CacheStore(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_malformed_setting_message_names_key() {
        let err = AppError::MalformedSetting {
            key: "home_sidebar_categories".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("home_sidebar_categories"));
    }
}
