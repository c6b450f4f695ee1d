//! In-memory record store.

use crate::traits::ProductRepository;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use strata_core::{NewProduct, Product, ProductId, StrataError, StrataResult};

/// Record store held in process memory.
///
/// Assigns identifiers from 1 upwards, skipping any taken by caller-supplied
/// IDs. Listing order is ascending ID, as with the SQL store.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    products: BTreeMap<ProductId, Product>,
    last_id: i64,
}

impl InMemoryProductRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with existing products.
    #[must_use]
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let repo = Self::new();
        {
            let mut state = repo.state.write();
            for product in products {
                state.last_id = state.last_id.max(product.id.into_inner());
                state.products.insert(product.id, product);
            }
        }
        repo
    }

    /// Returns the number of stored products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().products.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().products.is_empty()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> StrataResult<Option<Product>> {
        Ok(self.state.read().products.get(&id).cloned())
    }

    async fn find_all(&self) -> StrataResult<Vec<Product>> {
        Ok(self.state.read().products.values().cloned().collect())
    }

    async fn insert(&self, product: NewProduct) -> StrataResult<Product> {
        let mut state = self.state.write();
        let id = match product.id {
            Some(id) if state.products.contains_key(&id) => {
                return Err(StrataError::conflict(format!("Product {} already exists", id)));
            }
            Some(id) => {
                state.last_id = state.last_id.max(id.into_inner());
                id
            }
            None => {
                state.last_id = state
                    .last_id
                    .checked_add(1)
                    .ok_or_else(|| StrataError::StoreUnavailable("Product id sequence exhausted".to_string()))?;
                ProductId::new(state.last_id)
            }
        };

        let product = product.into_product(id);
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: &Product) -> StrataResult<bool> {
        let mut state = self.state.write();
        match state.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ProductId) -> StrataResult<bool> {
        Ok(self.state.write().products.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryProductRepository::new();

        let first = repo.insert(NewProduct::new("Lamp", 19.5)).await.unwrap();
        let second = repo.insert(NewProduct::new("Desk", 120.0)).await.unwrap();

        assert_eq!(first.id, ProductId::new(1));
        assert_eq!(second.id, ProductId::new(2));
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_with_explicit_id_advances_sequence() {
        let repo = InMemoryProductRepository::new();

        let mut explicit = NewProduct::new("Chair", 45.0);
        explicit.id = Some(ProductId::new(10));
        repo.insert(explicit).await.unwrap();

        let next = repo.insert(NewProduct::new("Stool", 30.0)).await.unwrap();
        assert_eq!(next.id, ProductId::new(11));
    }

    #[tokio::test]
    async fn test_insert_after_max_id_fails_without_wrapping() {
        let repo = InMemoryProductRepository::new();

        let mut last = NewProduct::new("Last", 1.0);
        last.id = Some(ProductId::new(i64::MAX));
        repo.insert(last).await.unwrap();

        let err = repo.insert(NewProduct::new("Next", 2.0)).await.unwrap_err();
        assert!(matches!(err, StrataError::StoreUnavailable(_)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_conflicts() {
        let repo = InMemoryProductRepository::with_products(vec![Product::new(
            ProductId::new(1),
            "Lamp",
            19.5,
        )]);

        let mut duplicate = NewProduct::new("Other", 1.0);
        duplicate.id = Some(ProductId::new(1));
        let err = repo.insert(duplicate).await.unwrap_err();
        assert!(matches!(err, StrataError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_id() {
        let repo = InMemoryProductRepository::with_products(vec![
            Product::new(ProductId::new(3), "C", 3.0),
            Product::new(ProductId::new(1), "A", 1.0),
            Product::new(ProductId::new(2), "B", 2.0),
        ]);

        let ids: Vec<i64> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_update_reports_missing_rows() {
        let repo = InMemoryProductRepository::new();
        let product = Product::new(ProductId::new(5), "Ghost", 0.0);
        assert!(!repo.update(&product).await.unwrap());

        let stored = repo.insert(NewProduct::new("Lamp", 19.5)).await.unwrap();
        let renamed = Product {
            name: "Floor lamp".to_string(),
            ..stored
        };
        assert!(repo.update(&renamed).await.unwrap());
        assert_eq!(
            repo.find_by_id(renamed.id).await.unwrap().unwrap().name,
            "Floor lamp"
        );
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = InMemoryProductRepository::new();
        let stored = repo.insert(NewProduct::new("Lamp", 19.5)).await.unwrap();

        assert!(repo.delete(stored.id).await.unwrap());
        assert!(!repo.delete(stored.id).await.unwrap());
        assert!(repo.find_by_id(stored.id).await.unwrap().is_none());
        assert!(repo.is_empty());
    }
}
