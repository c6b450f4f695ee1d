//! Expiration policies applied when a value is written to a tier.

use std::time::Duration;
use strata_config::CacheConfig;

/// How long a tier keeps an entry.
///
/// With both fields set the entry expires at whichever deadline comes first.
/// With neither set it never expires by time. Remote tiers only understand an
/// absolute lifetime and fall back to the sliding window if that is all
/// they are given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirationPolicy {
    /// Lifetime measured from the write.
    pub absolute_after: Option<Duration>,
    /// Idle window, renewed by every successful read.
    pub sliding: Option<Duration>,
}

impl ExpirationPolicy {
    /// Entry never expires by time.
    #[must_use]
    pub const fn never() -> Self {
        Self {
            absolute_after: None,
            sliding: None,
        }
    }

    /// Entry expires a fixed time after the write.
    #[must_use]
    pub const fn absolute(after: Duration) -> Self {
        Self {
            absolute_after: Some(after),
            sliding: None,
        }
    }

    /// Entry expires after a period without reads.
    #[must_use]
    pub const fn sliding(window: Duration) -> Self {
        Self {
            absolute_after: None,
            sliding: Some(window),
        }
    }

    /// Entry expires at the earlier of both deadlines.
    #[must_use]
    pub const fn absolute_and_sliding(after: Duration, window: Duration) -> Self {
        Self {
            absolute_after: Some(after),
            sliding: Some(window),
        }
    }

    /// Lifetime for stores that only support absolute expiry.
    #[must_use]
    pub fn time_to_live(&self) -> Option<Duration> {
        self.absolute_after.or(self.sliding)
    }
}

/// The three policies the product service applies, built from `CacheConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicies {
    /// Local tier, on reads and writes alike.
    pub local: ExpirationPolicy,
    /// Remote tier when populated by a read-through.
    pub remote_read: ExpirationPolicy,
    /// Remote tier when populated by a create or update.
    pub remote_write: ExpirationPolicy,
}

impl From<&CacheConfig> for TierPolicies {
    fn from(config: &CacheConfig) -> Self {
        Self {
            local: ExpirationPolicy {
                absolute_after: config.local_absolute(),
                sliding: config.local_sliding(),
            },
            remote_read: ExpirationPolicy::absolute(config.remote_read_ttl()),
            remote_write: ExpirationPolicy::absolute(config.remote_write_ttl()),
        }
    }
}

impl Default for TierPolicies {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}
