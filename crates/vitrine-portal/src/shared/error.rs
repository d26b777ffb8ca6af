//! Portal Error Types

use thiserror::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response, Json},
};

use crate::shared::api_common::ApiError;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Duplicate entity: {entity_type} with {field}={value}")]
    Duplicate { entity_type: String, field: String, value: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication required: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PortalError {
    pub fn not_found(entity_type: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(entity_type: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            PortalError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            PortalError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE"),
            PortalError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            PortalError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            PortalError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        // Store and internal failures must not leak detail to the caller.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ApiError {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_shapes() {
        let err = PortalError::not_found("Role", 42);
        assert!(matches!(err, PortalError::NotFound { .. }));
        assert!(err.to_string().contains("42"));

        let err = PortalError::duplicate("Role", "name", "admin");
        assert!(err.to_string().contains("name=admin"));
    }

    #[test]
    fn test_status_mapping() {
        use axum::response::IntoResponse;

        let resp = PortalError::unauthorized("no session").into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = PortalError::forbidden("missing permission").into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = PortalError::internal("boom").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
