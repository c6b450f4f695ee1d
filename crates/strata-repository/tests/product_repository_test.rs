//! Integration tests for MySqlProductRepository.
//!
//! These tests run against a real MySQL database using testcontainers and
//! need Docker, so they are ignored by default:
//! `cargo test -p strata-repository -- --ignored`.

mod common;

use common::TestDatabase;
use strata_core::{HealthCheck, NewProduct, Product, ProductId, StrataError};
use strata_repository::{MySqlProductRepository, ProductRepository};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insert_and_find_by_id() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    let saved = repo
        .insert(NewProduct::new("Desk lamp", 24.5))
        .await
        .expect("Failed to insert product");
    assert!(saved.id.into_inner() > 0);

    let found = repo
        .find_by_id(saved.id)
        .await
        .expect("Query failed")
        .expect("Product not found");
    assert_eq!(found, saved);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_id_not_found() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    let result = repo.find_by_id(ProductId::new(999)).await.expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insert_with_supplied_id_and_conflict() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    let mut product = NewProduct::new("Chair", 45.0);
    product.id = Some(ProductId::new(42));
    product.description = Some("Oak".to_string());
    let saved = repo.insert(product.clone()).await.expect("Failed to insert");
    assert_eq!(saved.id, ProductId::new(42));
    assert_eq!(saved.description.as_deref(), Some("Oak"));

    let err = repo.insert(product).await.unwrap_err();
    assert!(matches!(err, StrataError::Conflict(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_all_ordered() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    for name in ["A", "B", "C"] {
        repo.insert(NewProduct::new(name, 1.0)).await.expect("Failed to insert");
    }

    let all = repo.find_all().await.expect("Query failed");
    let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_existing_and_missing() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    let saved = repo.insert(NewProduct::new("Lamp", 10.0)).await.expect("Failed to insert");

    // Unchanged values still count as found.
    assert!(repo.update(&saved).await.expect("Update failed"));

    let changed = Product {
        price: 12.0,
        ..saved.clone()
    };
    assert!(repo.update(&changed).await.expect("Update failed"));
    let found = repo.find_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(found.price, 12.0);

    let missing = Product::new(ProductId::new(12345), "Ghost", 0.0);
    assert!(!repo.update(&missing).await.expect("Update failed"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_twice() {
    let db = TestDatabase::new().await;
    let repo = MySqlProductRepository::new(db.pool());

    let saved = repo.insert(NewProduct::new("Lamp", 10.0)).await.expect("Failed to insert");
    assert!(repo.delete(saved.id).await.expect("Delete failed"));
    assert!(!repo.delete(saved.id).await.expect("Delete failed"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_pool_health_check() {
    let db = TestDatabase::new().await;
    let pool = db.pool();

    assert_eq!(pool.name(), "database");
    assert!(pool.check().await.is_healthy());
}
