//! Test doubles for the record store and the remote tier.

use crate::cache::RemoteStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use strata_core::{NewProduct, Product, ProductId, StrataError, StrataResult};
use strata_repository::{InMemoryProductRepository, ProductRepository};
use tokio::time::Instant;

struct StoredPayload {
    payload: String,
    ttl: Option<Duration>,
    deadline: Option<Instant>,
}

/// Remote store kept in memory, counting calls and honouring TTLs against
/// the tokio clock.
#[derive(Default)]
pub struct MemoryRemoteStore {
    entries: Mutex<HashMap<String, StoredPayload>>,
    failing: AtomicBool,
    gets: AtomicUsize,
    sets: AtomicUsize,
    deletes: AtomicUsize,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail as an unreachable remote tier.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// TTL the key was last written with; `None` if the key is absent.
    pub fn ttl_of(&self, key: &str) -> Option<Option<Duration>> {
        self.entries.lock().get(key).map(|e| e.ttl)
    }

    /// Stored payload, ignoring expiry.
    pub fn payload(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).map(|e| e.payload.clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn check(&self) -> StrataResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StrataError::tier_unavailable("remote", "connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn get_raw(&self, key: &str) -> StrataResult<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut entries = self.entries.lock();
        let expired = entries
            .get(key)
            .and_then(|e| e.deadline)
            .is_some_and(|deadline| Instant::now() >= deadline);
        if expired {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|e| e.payload.clone()))
    }

    async fn set_raw(&self, key: &str, payload: &str, ttl: Option<Duration>) -> StrataResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.entries.lock().insert(
            key.to_string(),
            StoredPayload {
                payload: payload.to_string(),
                ttl,
                deadline: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> StrataResult<bool> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.entries.lock().remove(key).is_some())
    }
}

/// Record store wrapper counting calls, with optional failure and latency.
#[derive(Default)]
pub struct CountingRepository {
    inner: InMemoryProductRepository,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    find_by_id_calls: AtomicUsize,
    find_all_calls: AtomicUsize,
    writes: AtomicUsize,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            inner: InMemoryProductRepository::with_products(products),
            ..Self::default()
        }
    }

    /// Makes every call fail as an unreachable store.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Delays every call by `delay`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }

    pub fn find_by_id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    /// Inserts, updates and deletes seen.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Direct access that bypasses counters, failure and delay.
    pub fn inner(&self) -> &InMemoryProductRepository {
        &self.inner
    }

    async fn enter(&self) -> StrataResult<()> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StrataError::StoreUnavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for CountingRepository {
    async fn find_by_id(&self, id: ProductId) -> StrataResult<Option<Product>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> StrataResult<Vec<Product>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        self.inner.find_all().await
    }

    async fn insert(&self, product: NewProduct) -> StrataResult<Product> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        self.inner.insert(product).await
    }

    async fn update(&self, product: &Product) -> StrataResult<bool> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        self.inner.update(product).await
    }

    async fn delete(&self, id: ProductId) -> StrataResult<bool> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.enter().await?;
        self.inner.delete(id).await
    }
}
