//! Ordered chain of cache tiers, fastest first.

use super::{metrics, CacheTier, ExpirationPolicy};
use crate::dto::{TierOperation, TierWarning};
use std::sync::Arc;
use strata_core::StrataError;
use tracing::{debug, warn};

/// Which policy a write into the chain uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Population {
    /// Read-through after a miss, or promotion from a slower tier.
    Read,
    /// Create or update of the underlying record.
    Write,
}

/// One tier plus the policies it is populated with.
pub struct TierLink<V> {
    tier: Arc<dyn CacheTier<V>>,
    read_policy: ExpirationPolicy,
    write_policy: ExpirationPolicy,
}

impl<V: Send + Sync + 'static> TierLink<V> {
    fn policy(&self, population: Population) -> &ExpirationPolicy {
        match population {
            Population::Read => &self.read_policy,
            Population::Write => &self.write_policy,
        }
    }

    fn name(&self) -> &str {
        self.tier.name()
    }
}

/// A value found by [`TierChain::lookup`] and the tier that answered.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<V> {
    pub value: V,
    pub tier: String,
}

/// Tiers consulted in order; a hit in a slower tier is copied into every
/// faster one.
///
/// Reads treat a failing tier as a miss. Writes carry on past a failing tier
/// and report it as a [`TierWarning`]. A chain with no tiers always misses.
pub struct TierChain<V> {
    links: Vec<TierLink<V>>,
}

impl<V> TierChain<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self { links: Vec::new() }
    }

    /// Appends a tier behind the ones already added.
    #[must_use]
    pub fn with_tier(
        mut self,
        tier: Arc<dyn CacheTier<V>>,
        read_policy: ExpirationPolicy,
        write_policy: ExpirationPolicy,
    ) -> Self {
        self.links.push(TierLink {
            tier,
            read_policy,
            write_policy,
        });
        self
    }

    /// Tier names in lookup order.
    pub fn tier_names(&self) -> Vec<&str> {
        self.links.iter().map(TierLink::name).collect()
    }

    /// Number of tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if the chain has no tiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Looks `key` up tier by tier, promoting a hit into the faster tiers.
    pub async fn lookup(&self, key: &str) -> Option<Hit<V>> {
        for (index, link) in self.links.iter().enumerate() {
            match link.tier.get(key).await {
                Ok(Some(value)) => {
                    debug!(tier = link.name(), key, "Cache hit");
                    metrics::record_hit(link.name());
                    self.promote(&self.links[..index], key, &value).await;
                    return Some(Hit {
                        value,
                        tier: link.name().to_string(),
                    });
                }
                Ok(None) => debug!(tier = link.name(), key, "Cache miss"),
                Err(e) => {
                    warn!(tier = link.name(), key, error = %e, "Cache tier read failed, treating as miss");
                    metrics::record_tier_error(link.name(), TierOperation::Get.as_str());
                }
            }
        }

        metrics::record_miss();
        None
    }

    async fn promote(&self, faster: &[TierLink<V>], key: &str, value: &V) {
        for link in faster {
            match link.tier.set(key, value, link.policy(Population::Read)).await {
                Ok(()) => {
                    debug!(tier = link.name(), key, "Promoted value");
                    metrics::record_promotion(link.name());
                }
                Err(e) => {
                    warn!(tier = link.name(), key, error = %e, "Promotion failed");
                    metrics::record_tier_error(link.name(), TierOperation::Set.as_str());
                }
            }
        }
    }

    /// Stores `value` in every tier with the policy for `population`.
    pub async fn populate(&self, key: &str, value: &V, population: Population) -> Vec<TierWarning> {
        let mut warnings = Vec::new();
        for link in &self.links {
            if let Err(e) = link.tier.set(key, value, link.policy(population)).await {
                warnings.push(tier_warning(link.name(), key, TierOperation::Set, &e));
            }
        }
        warnings
    }

    /// Removes `key` from every tier.
    pub async fn invalidate(&self, key: &str) -> Vec<TierWarning> {
        let mut warnings = Vec::new();
        for link in &self.links {
            if let Err(e) = link.tier.remove(key).await {
                warnings.push(tier_warning(link.name(), key, TierOperation::Remove, &e));
            }
        }
        debug!(key, "Invalidated key in all tiers");
        warnings
    }
}

fn tier_warning(tier: &str, key: &str, operation: TierOperation, error: &StrataError) -> TierWarning {
    warn!(tier, key, %operation, error = %error, "Cache tier write failed");
    metrics::record_tier_error(tier, operation.as_str());
    TierWarning {
        tier: tier.to_string(),
        key: key.to_string(),
        operation,
        message: error.to_string(),
    }
}

impl<V> Default for TierChain<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
