//! Unified error handling with Sentry integration.
//!
//! Lower layers carry their own `thiserror` enums; `AppError` is the
//! service-level aggregation used at the webhook boundary, where every
//! failure must surface as an HTTP status code and a plaintext body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::adapters::ConversionError;
use crate::datastore::DataStoreError;
use crate::host::HostError;
use crate::poynt::PoyntError;

/// Application-level error type for the sync service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Host platform storage failed.
    #[error("Host storage error: {0}")]
    Host(#[from] HostError),

    /// Adapter could not map a required field.
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Data-store read or save failed.
    #[error("Data store error: {0}")]
    DataStore(#[from] DataStoreError),

    /// Remote payments API call failed.
    #[error("Poynt error: {0}")]
    Poynt(#[from] PoyntError),

    /// Webhook signature missing or did not match.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Inbound payload is missing a required field.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Inbound credentials conflict with previously stored values.
    #[error("Credential mismatch: {0}")]
    CredentialMismatch(&'static str),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal service error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server-side failures to Sentry
        if matches!(self, Self::Host(_) | Self::Poynt(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Host(_) | Self::Internal(_) | Self::Conversion(_) | Self::DataStore(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Poynt(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::MissingField(_) => StatusCode::BAD_REQUEST,
            Self::CredentialMismatch(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to callers
        let message = match &self {
            Self::Host(_) | Self::Internal(_) | Self::Conversion(_) | Self::DataStore(_) => {
                "Internal server error".to_string()
            }
            Self::Poynt(_) => "External service error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_webhook_boundary_status_codes() {
        assert_eq!(status_of(AppError::InvalidSignature), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::MissingField("businessId")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::CredentialMismatch("applicationId")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::NotFound("order 42".to_string())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_display() {
        let err = AppError::MissingField("serviceType");
        assert_eq!(err.to_string(), "Missing required field: serviceType");
    }
}
