//! MySQL product repository implementation.

use crate::{traits::ProductRepository, DatabasePool};
use async_trait::async_trait;
use sqlx::FromRow;
use std::sync::Arc;
use strata_core::{NewProduct, Product, ProductId, StrataError, StrataResult};
use tracing::debug;

/// MySQL product repository implementation.
#[derive(Clone)]
pub struct MySqlProductRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlProductRepository {
    /// Creates a new MySQL product repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: ProductId) -> StrataResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ? LIMIT 1")
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(found.is_some())
    }
}

/// Database row representation of a product.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
    price: f64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
        }
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn find_by_id(&self, id: ProductId) -> StrataResult<Option<Product>> {
        debug!("Finding product by id: {}", id);

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, price
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_all(&self) -> StrataResult<Vec<Product>> {
        debug!("Listing all products");

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, price
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn insert(&self, product: NewProduct) -> StrataResult<Product> {
        let result = match product.id {
            Some(id) => {
                debug!("Inserting product with caller-supplied id: {}", id);
                sqlx::query(
                    r#"
                    INSERT INTO products (id, name, description, price)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(id.into_inner())
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price)
                .execute(self.pool.inner())
                .await?
            }
            None => {
                debug!("Inserting product: {}", product.name);
                sqlx::query(
                    r#"
                    INSERT INTO products (name, description, price)
                    VALUES (?, ?, ?)
                    "#,
                )
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price)
                .execute(self.pool.inner())
                .await?
            }
        };

        let id = match product.id {
            Some(id) => id,
            None => i64::try_from(result.last_insert_id())
                .map(ProductId::new)
                .map_err(|_| StrataError::internal("Generated product id exceeds i64"))?,
        };
        Ok(product.into_product(id))
    }

    async fn update(&self, product: &Product) -> StrataResult<bool> {
        debug!("Updating product: {}", product.id);

        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.id.into_inner())
        .execute(self.pool.inner())
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }
        // MySQL reports zero affected rows when the new values equal the old ones.
        self.exists(product.id).await
    }

    async fn delete(&self, id: ProductId) -> StrataResult<bool> {
        debug!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
