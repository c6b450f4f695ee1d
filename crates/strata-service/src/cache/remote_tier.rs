//! Typed view over a remote string store.

use super::{CacheTier, Codec, ExpirationPolicy, JsonCodec, RemoteStore, REMOTE_TIER};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use strata_core::{StrataError, StrataResult};

/// Remote cache tier: a [`RemoteStore`] paired with a [`Codec`].
///
/// Only the absolute part of a policy reaches the store; sliding windows are
/// a local-tier concept.
pub struct RemoteTier<C = JsonCodec> {
    store: Arc<dyn RemoteStore>,
    codec: C,
}

impl RemoteTier<JsonCodec> {
    /// Creates a remote tier encoding values as JSON.
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self::with_codec(store, JsonCodec)
    }
}

impl<C: Codec> RemoteTier<C> {
    /// Creates a remote tier with a custom codec.
    #[must_use]
    pub fn with_codec(store: Arc<dyn RemoteStore>, codec: C) -> Self {
        Self { store, codec }
    }
}

#[async_trait]
impl<V, C> CacheTier<V> for RemoteTier<C>
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
    C: Codec,
{
    fn name(&self) -> &str {
        REMOTE_TIER
    }

    async fn get(&self, key: &str) -> StrataResult<Option<V>> {
        match self.store.get_raw(key).await? {
            Some(payload) => self.codec.decode(&payload).map(Some).map_err(|e| {
                StrataError::tier_unavailable(REMOTE_TIER, format!("undecodable payload for '{}': {}", key, e))
            }),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &V, policy: &ExpirationPolicy) -> StrataResult<()> {
        let payload = self.codec.encode(value)?;
        self.store.set_raw(key, &payload, policy.time_to_live()).await
    }

    async fn remove(&self, key: &str) -> StrataResult<()> {
        self.store.delete(key).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryRemoteStore;
    use std::time::Duration;
    use strata_core::{Product, ProductId};

    #[tokio::test]
    async fn test_round_trip_through_store() {
        let store = Arc::new(MemoryRemoteStore::new());
        let tier = RemoteTier::new(store.clone());
        let product = Product::new(ProductId::new(1), "Kettle", 29.5);

        tier.set("product_1", &product, &ExpirationPolicy::absolute(Duration::from_secs(30)))
            .await
            .unwrap();

        assert_eq!(store.ttl_of("product_1"), Some(Some(Duration::from_secs(30))));
        let cached: Option<Product> = tier.get("product_1").await.unwrap();
        assert_eq!(cached, Some(product));
    }

    #[tokio::test]
    async fn test_sliding_only_policy_becomes_absolute_ttl() {
        let store = Arc::new(MemoryRemoteStore::new());
        let tier = RemoteTier::new(store.clone());

        tier.set("k", &1_u32, &ExpirationPolicy::sliding(Duration::from_secs(9)))
            .await
            .unwrap();
        assert_eq!(store.ttl_of("k"), Some(Some(Duration::from_secs(9))));
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_tier_error() {
        let store = Arc::new(MemoryRemoteStore::new());
        store.set_raw("product_1", "garbage", None).await.unwrap();
        let tier = RemoteTier::new(store);

        let err = CacheTier::<Product>::get(&tier, "product_1").await.unwrap_err();
        assert!(matches!(err, StrataError::TierUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let tier = RemoteTier::new(Arc::new(MemoryRemoteStore::new()));
        CacheTier::<Product>::remove(&tier, "nothing").await.unwrap();
    }
}
