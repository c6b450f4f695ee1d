//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Strata.
///
/// Only a subset of these ever reaches an API caller: the product service
/// absorbs `TierUnavailable` on reads and turns it into a warning on writes.
#[derive(Error, Debug)]
pub enum StrataError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate identifier)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Infrastructure Errors ============
    /// The record store could not be reached or failed the query.
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    /// A cache tier could not be reached.
    #[error("Cache tier '{tier}' unavailable: {message}")]
    TierUnavailable { tier: String, message: String },

    /// Payload could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Resilience Errors ============
    /// Circuit breaker open
    #[error("Service unavailable: circuit breaker open for {0}")]
    CircuitBreakerOpen(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrataError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::StoreUnavailable(_)
            | Self::TierUnavailable { .. }
            | Self::CircuitBreakerOpen(_)
            | Self::Timeout(_) => 503,
            Self::Codec(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::TierUnavailable { .. } => "TIER_UNAVAILABLE",
            Self::Codec(_) => "CODEC_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::CircuitBreakerOpen(_) => "CIRCUIT_BREAKER_OPEN",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a tier-unavailable error.
    #[must_use]
    pub fn tier_unavailable<T: Into<String>, M: Into<String>>(tier: T, message: M) -> Self {
        Self::TierUnavailable {
            tier: tier.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_)
                | Self::TierUnavailable { .. }
                | Self::CircuitBreakerOpen(_)
                | Self::Timeout(_)
        )
    }

    /// Checks if this error should trip a circuit breaker.
    #[must_use]
    pub const fn should_trip_circuit_breaker(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::TierUnavailable { .. } | Self::Timeout(_)
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for StrataError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(code) = db_err.code() {
                // PostgreSQL / MySQL unique violation
                if code == "23505" || code == "1062" || code == "23000" {
                    return Self::Conflict(db_err.message().to_string());
                }
            }
        }
        Self::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for StrataError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `StrataError`.
    #[must_use]
    pub fn from_error(error: &StrataError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&StrataError> for ErrorResponse {
    fn from(error: &StrataError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(StrataError::not_found("Product", 1).status_code(), 404);
        assert_eq!(StrataError::validation("id mismatch").status_code(), 400);
        assert_eq!(StrataError::conflict("duplicate").status_code(), 409);
        assert_eq!(StrataError::StoreUnavailable("down".to_string()).status_code(), 503);
        assert_eq!(StrataError::tier_unavailable("remote", "refused").status_code(), 503);
        assert_eq!(StrataError::Timeout("slow".to_string()).status_code(), 503);
        assert_eq!(StrataError::Codec("bad".to_string()).status_code(), 500);
        assert_eq!(StrataError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(StrataError::not_found("Product", 1).error_code(), "NOT_FOUND");
        assert_eq!(StrataError::validation("bad").error_code(), "VALIDATION_ERROR");
        assert_eq!(StrataError::conflict("dup").error_code(), "CONFLICT");
        assert_eq!(
            StrataError::StoreUnavailable("x".to_string()).error_code(),
            "STORE_UNAVAILABLE"
        );
        assert_eq!(
            StrataError::tier_unavailable("remote", "x").error_code(),
            "TIER_UNAVAILABLE"
        );
        assert_eq!(StrataError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_retriable_errors() {
        assert!(StrataError::StoreUnavailable("connection lost".to_string()).is_retriable());
        assert!(StrataError::tier_unavailable("remote", "reset").is_retriable());
        assert!(!StrataError::not_found("Product", 1).is_retriable());
        assert!(!StrataError::validation("bad input").is_retriable());
        assert!(!StrataError::conflict("dup").is_retriable());
    }

    #[test]
    fn test_circuit_breaker_errors() {
        assert!(StrataError::tier_unavailable("remote", "refused").should_trip_circuit_breaker());
        assert!(StrataError::Timeout("timeout".to_string()).should_trip_circuit_breaker());
        assert!(!StrataError::validation("bad input").should_trip_circuit_breaker());
        assert!(!StrataError::not_found("Product", 1).should_trip_circuit_breaker());
    }

    #[test]
    fn test_error_display() {
        let err = StrataError::not_found("Product", 42);
        assert_eq!(err.to_string(), "Resource not found: Product with id 42");

        let err = StrataError::tier_unavailable("remote", "connection refused");
        assert!(err.to_string().contains("remote"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_serde_error_is_codec() {
        let err: StrataError = serde_json::from_str::<i64>("not json").unwrap_err().into();
        assert!(matches!(err, StrataError::Codec(_)));
    }

    #[test]
    fn test_error_response_from_error() {
        let err = StrataError::not_found("Product", 1);
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(!response.message.is_empty());
        assert!(response.details.is_none());
    }

    #[test]
    fn test_error_response_with_details() {
        let err = StrataError::validation("bad input");
        let details = vec![FieldError {
            field: "price".to_string(),
            message: "Price must not be negative".to_string(),
            code: "range".to_string(),
        }];
        let response = ErrorResponse::from(&err).with_details(details);
        assert_eq!(response.details.map(|d| d.len()), Some(1));
    }
}
