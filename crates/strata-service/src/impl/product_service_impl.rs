//! Tiered product service: local tier, then remote tier, then record store.

use crate::cache::metrics::record_store_load;
use crate::cache::{
    cache_keys, LocalTier, Population, RemoteStore, RemoteTier, TierChain, TierPolicies,
};
use crate::dto::{ProductRequest, TierWarning, WriteOutcome};
use crate::product_service::ProductService;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use strata_config::CacheConfig;
use strata_core::{Product, ProductId, StrataError, StrataResult, ValidateExt};
use strata_repository::ProductRepository;
use strata_resilience::with_timeout;
use tracing::{debug, info};

/// Resource name used in not-found errors.
const PRODUCT: &str = "Product";

/// Product service fronting the record store with two tier chains: one for
/// single products and one for the full listing.
///
/// The store is the source of truth. Reads go through the chains and fall
/// back to the store; mutations hit the store first and then refresh or
/// invalidate the chains. The listing is never patched, only dropped.
pub struct TieredProductService {
    repository: Arc<dyn ProductRepository>,
    products: TierChain<Product>,
    catalog: TierChain<Vec<Product>>,
    store_timeout: Duration,
}

impl TieredProductService {
    /// Creates a service over explicit tier chains.
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        products: TierChain<Product>,
        catalog: TierChain<Vec<Product>>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            products,
            catalog,
            store_timeout,
        }
    }

    /// Builds the standard chains from configuration: a local tier for each
    /// value type, followed by the remote tier when a store is given.
    pub fn from_config(
        repository: Arc<dyn ProductRepository>,
        config: &CacheConfig,
        remote: Option<Arc<dyn RemoteStore>>,
        store_timeout: Duration,
    ) -> Self {
        let policies = TierPolicies::from(config);

        let mut products = TierChain::<Product>::new().with_tier(
            Arc::new(LocalTier::<Product>::with_capacity("local", config.local_max_entries)),
            policies.local,
            policies.local,
        );
        let mut catalog = TierChain::<Vec<Product>>::new().with_tier(
            Arc::new(LocalTier::<Vec<Product>>::with_capacity("local", config.local_max_entries)),
            policies.local,
            policies.local,
        );

        if let Some(store) = remote {
            products = products.with_tier(
                Arc::new(RemoteTier::new(store.clone())),
                policies.remote_read,
                policies.remote_write,
            );
            catalog = catalog.with_tier(
                Arc::new(RemoteTier::new(store)),
                policies.remote_read,
                policies.remote_write,
            );
        }

        info!(tiers = ?products.tier_names(), "Product cache chain ready");
        Self::new(repository, products, catalog, store_timeout)
    }

    /// Tier names consulted for single products, fastest first.
    pub fn tier_names(&self) -> Vec<&str> {
        self.products.tier_names()
    }

    /// Runs a store call under the store timeout. A timeout means the store
    /// is unavailable.
    async fn store<T, F, Fut>(&self, operation: &'static str, f: F) -> StrataResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StrataResult<T>>,
    {
        with_timeout(self.store_timeout, operation, f)
            .await
            .map_err(|e| match e {
                StrataError::Timeout(message) => StrataError::StoreUnavailable(message),
                other => other,
            })
    }

    /// Refreshes the product key and drops the listing after a store write.
    async fn refresh_after_write(&self, product: &Product) -> Vec<TierWarning> {
        let mut warnings = self
            .products
            .populate(&cache_keys::product(product.id), product, Population::Write)
            .await;
        warnings.extend(self.catalog.invalidate(cache_keys::ALL_PRODUCTS).await);
        warnings
    }
}

#[async_trait]
impl ProductService for TieredProductService {
    async fn get_product(&self, id: ProductId) -> StrataResult<Product> {
        debug!("Getting product: {}", id);

        let key = cache_keys::product(id);
        if let Some(hit) = self.products.lookup(&key).await {
            debug!(tier = %hit.tier, "Product {} served from cache", id);
            return Ok(hit.value);
        }

        let product = self
            .store("find_by_id", || self.repository.find_by_id(id))
            .await?
            .ok_or_else(|| StrataError::not_found(PRODUCT, id))?;
        record_store_load();

        // Tier failures here are already logged; reads do not report them.
        self.products.populate(&key, &product, Population::Read).await;
        Ok(product)
    }

    async fn list_products(&self) -> StrataResult<Vec<Product>> {
        debug!("Listing products");

        if let Some(hit) = self.catalog.lookup(cache_keys::ALL_PRODUCTS).await {
            debug!(tier = %hit.tier, "Product listing served from cache");
            return Ok(hit.value);
        }

        let products = self.store("find_all", || self.repository.find_all()).await?;
        record_store_load();

        if products.is_empty() {
            return Err(StrataError::not_found(PRODUCT, "all"));
        }

        self.catalog
            .populate(cache_keys::ALL_PRODUCTS, &products, Population::Read)
            .await;
        Ok(products)
    }

    async fn create_product(&self, request: ProductRequest) -> StrataResult<WriteOutcome<Product>> {
        debug!("Creating product: {}", request.name);

        request.validate_request()?;

        let new_product = request.into_new_product();
        let product = self
            .store("insert", || self.repository.insert(new_product))
            .await?;

        let warnings = self.refresh_after_write(&product).await;

        info!(warnings = warnings.len(), "Product created: {}", product.id);
        Ok(WriteOutcome::with_warnings(product, warnings))
    }

    async fn update_product(
        &self,
        id: ProductId,
        request: ProductRequest,
    ) -> StrataResult<WriteOutcome<Product>> {
        debug!("Updating product: {}", id);

        match request.id {
            Some(body_id) if body_id == id => {}
            Some(body_id) => {
                return Err(StrataError::validation(format!(
                    "Product id {} in body does not match id {} in path",
                    body_id, id
                )))
            }
            None => return Err(StrataError::validation("Product id is required in the body")),
        }
        request.validate_request()?;

        let product = request.into_product(id);
        let updated = self
            .store("update", || self.repository.update(&product))
            .await?;
        if !updated {
            return Err(StrataError::not_found(PRODUCT, id));
        }

        let warnings = self.refresh_after_write(&product).await;

        info!(warnings = warnings.len(), "Product updated: {}", id);
        Ok(WriteOutcome::with_warnings(product, warnings))
    }

    async fn delete_product(&self, id: ProductId) -> StrataResult<WriteOutcome<()>> {
        debug!("Deleting product: {}", id);

        if self
            .store("find_by_id", || self.repository.find_by_id(id))
            .await?
            .is_none()
        {
            return Err(StrataError::not_found(PRODUCT, id));
        }

        // A concurrent delete can still win between the lookup and here.
        if !self.store("delete", || self.repository.delete(id)).await? {
            return Err(StrataError::not_found(PRODUCT, id));
        }

        let mut warnings = self.products.invalidate(&cache_keys::product(id)).await;
        warnings.extend(self.catalog.invalidate(cache_keys::ALL_PRODUCTS).await);

        info!(warnings = warnings.len(), "Product deleted: {}", id);
        Ok(WriteOutcome::with_warnings((), warnings))
    }
}
