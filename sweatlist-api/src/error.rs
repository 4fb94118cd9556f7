//! Error types for the sweatlist HTTP service
//!
//! Lower layers return typed failures; handlers translate each one to a
//! single HTTP status here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::catalog::CatalogError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Monthly suggestion allowance exhausted (403)
    #[error("No suggestion quota remaining for this month")]
    QuotaExhausted,

    /// Upstream catalog unreachable or failing (503)
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<sweatlist_common::Error> for ApiError {
    fn from(err: sweatlist_common::Error) -> Self {
        use sweatlist_common::Error;
        match err {
            Error::QuotaExhausted => ApiError::QuotaExhausted,
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
            Error::Io(e) => ApiError::Internal(format!("IO error: {}", e)),
            Error::Config(msg) => ApiError::Internal(format!("Configuration error: {}", msg)),
            Error::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::InvalidReference(reference) => {
                ApiError::BadRequest(format!("Invalid track reference: {}", reference))
            }
            // Missing credentials, failed token exchange and failed catalog
            // requests all surface as "upstream unavailable" to callers.
            other => ApiError::CatalogUnavailable(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::QuotaExhausted => (
                StatusCode::FORBIDDEN,
                "QUOTA_EXHAUSTED",
                "No suggestion quota remaining for this month.".to_string(),
            ),
            ApiError::CatalogUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "CATALOG_UNAVAILABLE", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_exhausted_maps_to_403() {
        let response = ApiError::QuotaExhausted.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_catalog_errors_map_to_503() {
        let err: ApiError = CatalogError::CredentialsMissing.into();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);

        let err: ApiError = CatalogError::TokenExchangeFailed("status 500".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_invalid_reference_maps_to_400() {
        let err: ApiError = CatalogError::InvalidReference("not-a-valid-uri".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_common_error_mapping() {
        let err: ApiError = sweatlist_common::Error::QuotaExhausted.into();
        assert!(matches!(err, ApiError::QuotaExhausted));

        let err: ApiError = sweatlist_common::Error::NotFound("x".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
