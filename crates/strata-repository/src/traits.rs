//! Repository trait definitions.

use async_trait::async_trait;
use strata_core::{NewProduct, Product, ProductId, StrataResult};

/// Record store contract for products.
///
/// The store is the source of truth. Implementations report absence through
/// `Option`/`bool` and reserve errors for infrastructure failures.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Finds a product by ID.
    async fn find_by_id(&self, id: ProductId) -> StrataResult<Option<Product>>;

    /// Lists every product, ordered by ID.
    async fn find_all(&self) -> StrataResult<Vec<Product>>;

    /// Inserts a product, assigning an ID when the caller did not supply one.
    async fn insert(&self, product: NewProduct) -> StrataResult<Product>;

    /// Replaces an existing product. Returns false if no row has that ID.
    async fn update(&self, product: &Product) -> StrataResult<bool>;

    /// Deletes a product by ID. Returns false if no row has that ID.
    async fn delete(&self, id: ProductId) -> StrataResult<bool>;
}
