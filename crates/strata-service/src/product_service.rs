//! Product service trait definition.

use crate::dto::{ProductRequest, WriteOutcome};
use async_trait::async_trait;
use strata_core::{Product, ProductId, StrataResult};

/// Product use cases as seen by the transport layer.
///
/// Reads never fail because of a cache tier. Mutations succeed once the
/// record store accepts them; tiers that could not be refreshed are listed
/// in the returned [`WriteOutcome`].
#[async_trait]
pub trait ProductService: Send + Sync {
    /// Gets a product by ID.
    async fn get_product(&self, id: ProductId) -> StrataResult<Product>;

    /// Lists every product. An empty listing is `NotFound`.
    async fn list_products(&self) -> StrataResult<Vec<Product>>;

    /// Creates a product, letting the store assign an ID if none is given.
    async fn create_product(&self, request: ProductRequest) -> StrataResult<WriteOutcome<Product>>;

    /// Replaces the product at `id`. The body ID must be present and equal.
    async fn update_product(
        &self,
        id: ProductId,
        request: ProductRequest,
    ) -> StrataResult<WriteOutcome<Product>>;

    /// Deletes a product.
    async fn delete_product(&self, id: ProductId) -> StrataResult<WriteOutcome<()>>;
}
