//! Process-local cache tier.

use super::{CacheTier, ExpirationPolicy};
use async_trait::async_trait;
use moka::sync::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};
use strata_core::StrataResult;

/// Default capacity of a local tier.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Clone)]
struct Entry<V> {
    value: V,
    policy: ExpirationPolicy,
}

/// Derives each entry's lifetime from the policy it was written with.
struct PolicyExpiry;

impl PolicyExpiry {
    fn lifetime(policy: &ExpirationPolicy) -> Option<Duration> {
        match (policy.absolute_after, policy.sliding) {
            (Some(after), Some(window)) => Some(after.min(window)),
            (after, window) => after.or(window),
        }
    }
}

impl<V> Expiry<String, Entry<V>> for PolicyExpiry {
    fn expire_after_create(&self, _key: &String, entry: &Entry<V>, _created_at: Instant) -> Option<Duration> {
        Self::lifetime(&entry.policy)
    }

    fn expire_after_read(
        &self,
        _key: &String,
        entry: &Entry<V>,
        read_at: Instant,
        duration_until_expiry: Option<Duration>,
        last_modified_at: Instant,
    ) -> Option<Duration> {
        let Some(window) = entry.policy.sliding else {
            return duration_until_expiry;
        };
        match entry.policy.absolute_after {
            Some(after) => {
                let age = read_at.saturating_duration_since(last_modified_at);
                Some(after.saturating_sub(age).min(window))
            }
            None => Some(window),
        }
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Self::lifetime(&entry.policy)
    }
}

/// In-memory tier holding decoded values.
///
/// Backed by a bounded `moka` cache: reads on different keys proceed
/// concurrently, expired entries are never returned and are swept during
/// housekeeping, and a full tier evicts by access frequency. Each entry
/// carries its own [`ExpirationPolicy`]; a read renews the sliding window but
/// never past the absolute deadline. Values are cloned in and out.
pub struct LocalTier<V> {
    name: String,
    cache: Cache<String, Entry<V>>,
}

impl<V> LocalTier<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a local tier named `local` with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity("local", DEFAULT_MAX_ENTRIES)
    }

    /// Creates a local tier with a name and a maximum entry count.
    #[must_use]
    pub fn with_capacity(name: impl Into<String>, max_entries: usize) -> Self {
        let name = name.into();
        let cache = Cache::builder()
            .name(&name)
            .max_capacity(max_entries.max(1) as u64)
            .expire_after(PolicyExpiry)
            .build();
        Self { name, cache }
    }

    /// Returns a copy of the live value under `key`, renewing its sliding window.
    pub fn get_value(&self, key: &str) -> Option<V> {
        self.cache.get(key).map(|entry| entry.value)
    }

    /// Stores a copy of `value` under `key`, replacing any previous entry.
    pub fn set_value(&self, key: &str, value: V, policy: &ExpirationPolicy) {
        self.cache.insert(
            key.to_string(),
            Entry {
                value,
                policy: *policy,
            },
        );
    }

    /// Removes `key` if present.
    pub fn remove_value(&self, key: &str) {
        self.cache.invalidate(key);
    }
}

impl<V> Default for LocalTier<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<V> CacheTier<V> for LocalTier<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> StrataResult<Option<V>> {
        Ok(self.get_value(key))
    }

    async fn set(&self, key: &str, value: &V, policy: &ExpirationPolicy) -> StrataResult<()> {
        self.set_value(key, value.clone(), policy);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StrataResult<()> {
        self.remove_value(key);
        Ok(())
    }
}
