//! API response types.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use strata_core::{ErrorResponse, FieldError, StrataError};
use strata_service::TierWarning;
use tracing::{error, warn};

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError {
    pub error: StrataError,
    pub details: Option<Vec<FieldError>>,
}

impl AppError {
    /// Attaches field-level details to the response body.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<StrataError> for AppError {
    fn from(error: StrataError) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = self.error.error_code(), "Request failed: {}", self.error);
        }

        let mut body = ErrorResponse::from_error(&self.error);
        if let Some(details) = self.details {
            body = body.with_details(details);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<T, AppError>;

/// Agent name used in `Warning` headers.
const WARN_AGENT: &str = "strata";

/// Builds `Warning: 199 strata "..."` headers, one per tier warning.
#[must_use]
pub fn warning_headers(warnings: &[TierWarning]) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for warning in warnings {
        let text = warning.to_string().replace(['"', '\\'], "'");
        match HeaderValue::from_str(&format!("199 {} \"{}\"", WARN_AGENT, text)) {
            Ok(value) => {
                headers.append(header::WARNING, value);
            }
            Err(_) => warn!("Dropping tier warning that is not a valid header value: {}", text),
        }
    }
    headers
}

/// Helper to create a created (201) response with a `Location` header.
pub fn created<T: serde::Serialize>(location: &str, body: T, mut headers: HeaderMap) -> Response {
    if let Ok(value) = HeaderValue::from_str(location) {
        headers.insert(header::LOCATION, value);
    }
    (StatusCode::CREATED, headers, Json(body)).into_response()
}

/// Helper to create a no content (204) response.
pub fn no_content(headers: HeaderMap) -> Response {
    (StatusCode::NO_CONTENT, headers).into_response()
}
