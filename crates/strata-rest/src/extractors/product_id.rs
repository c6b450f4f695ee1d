//! Product ID path extractor.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use strata_core::{ProductId, StrataError};

/// Extracts the `{id}` path segment as a [`ProductId`].
///
/// A segment that is not an integer is rejected with 400.
#[derive(Debug, Clone, Copy)]
pub struct ProductIdPath(pub ProductId);

#[async_trait]
impl<S> FromRequestParts<S> for ProductIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| StrataError::validation(format!("Invalid path: {}", e.body_text())))?;

        parse_product_id(&raw).map(Self).map_err(AppError::from)
    }
}

/// Parses a product ID from a path segment.
pub fn parse_product_id(raw: &str) -> Result<ProductId, StrataError> {
    ProductId::parse(raw)
        .map_err(|_| StrataError::validation(format!("Invalid product ID: '{}'", raw)))
}
