//! The capability every cache tier exposes to the tier chain.

use super::ExpirationPolicy;
use async_trait::async_trait;
use strata_core::StrataResult;

/// One level of the cache hierarchy.
///
/// Tiers report transport failures as errors and never swallow them; the
/// caller decides whether a failure is a miss or a warning.
#[async_trait]
pub trait CacheTier<V>: Send + Sync {
    /// Short name used in logs, metrics and warnings (`local`, `remote`).
    fn name(&self) -> &str;

    /// Returns a copy of the cached value, or `None` if absent or expired.
    async fn get(&self, key: &str) -> StrataResult<Option<V>>;

    /// Stores a copy of `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: &V, policy: &ExpirationPolicy) -> StrataResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> StrataResult<()>;
}
