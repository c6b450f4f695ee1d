//! Shared string store behind the remote tier, with a Redis implementation.

use async_trait::async_trait;
use deadpool_redis::redis::{self, FromRedisValue};
use deadpool_redis::{Config, Pool, Runtime};
use std::sync::Arc;
use std::time::Duration;
use strata_config::RedisConfig;
use strata_core::{HealthCheck, HealthStatus, StrataError, StrataResult};
use strata_resilience::{with_timeout, CircuitBreaker, CircuitBreakerConfig, CircuitState};
use tracing::{debug, info};

/// Tier name reported for remote failures.
pub const REMOTE_TIER: &str = "remote";

/// Key/value store holding serialized payloads.
///
/// Uses strings for type-erased storage so the trait stays dyn-compatible;
/// [`RemoteTier`](super::RemoteTier) adds typing on top.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Get a raw payload. Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> StrataResult<Option<String>>;

    /// Set a raw payload, expiring after `ttl` if given.
    async fn set_raw(&self, key: &str, payload: &str, ttl: Option<Duration>) -> StrataResult<()>;

    /// Delete a key. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> StrataResult<bool>;
}

/// Redis-backed remote store.
///
/// Every command is bounded by the operation timeout and passes through a
/// circuit breaker. All failures surface as `StrataError::TierUnavailable`.
pub struct RedisStore {
    pool: Pool,
    key_prefix: String,
    timeout: Duration,
    breaker: CircuitBreaker,
}

impl RedisStore {
    /// Creates a Redis store from an existing pool.
    #[must_use]
    pub fn new(pool: Pool, key_prefix: impl Into<String>, timeout: Duration, breaker: CircuitBreaker) -> Self {
        Self {
            pool,
            key_prefix: key_prefix.into(),
            timeout,
            breaker,
        }
    }

    /// Builds the connection pool and store from configuration.
    pub fn from_config(config: &RedisConfig) -> StrataResult<Self> {
        info!("Creating Redis connection pool for the remote tier...");

        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| StrataError::Configuration(format!("Invalid Redis config: {}", e)))?
            .max_size(config.pool_size as usize)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| StrataError::Configuration(format!("Failed to create Redis pool: {}", e)))?;

        let breaker = CircuitBreaker::new(
            REMOTE_TIER,
            CircuitBreakerConfig::new(config.breaker_failure_threshold, config.breaker_reset()),
        );

        Ok(Self::new(pool, config.key_prefix.clone(), config.operation_timeout(), breaker))
    }

    /// Returns the state of the breaker guarding Redis.
    pub fn circuit_state(&self) -> CircuitState {
        self.breaker.state()
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    async fn execute<T: FromRedisValue>(&self, operation: &'static str, cmd: redis::Cmd) -> StrataResult<T> {
        let result = self
            .breaker
            .call(|| {
                with_timeout(self.timeout, operation, || async {
                    let mut conn = self.pool.get().await.map_err(|e| {
                        StrataError::tier_unavailable(REMOTE_TIER, format!("connection: {}", e))
                    })?;
                    let value: T = cmd.query_async(&mut conn).await.map_err(|e| {
                        StrataError::tier_unavailable(REMOTE_TIER, format!("{}: {}", operation, e))
                    })?;
                    Ok(value)
                })
            })
            .await;

        result.map_err(|e| match StrataError::from(e) {
            err @ StrataError::TierUnavailable { .. } => err,
            other => StrataError::tier_unavailable(REMOTE_TIER, other.to_string()),
        })
    }
}

/// Seconds for `SET .. EX`, rounded up so sub-second lifetimes still expire.
fn expire_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
    secs.max(1)
}

#[async_trait]
impl RemoteStore for RedisStore {
    async fn get_raw(&self, key: &str) -> StrataResult<Option<String>> {
        let key = self.prefixed(key);
        let value: Option<String> = self.execute("GET", redis::cmd("GET").arg(&key).clone()).await?;

        match &value {
            Some(_) => debug!("Redis hit for key '{}'", key),
            None => debug!("Redis miss for key '{}'", key),
        }
        Ok(value)
    }

    async fn set_raw(&self, key: &str, payload: &str, ttl: Option<Duration>) -> StrataResult<()> {
        let key = self.prefixed(key);
        let mut cmd = redis::cmd("SET");
        cmd.arg(&key).arg(payload);
        if let Some(ttl) = ttl {
            cmd.arg("EX").arg(expire_seconds(ttl));
        }

        self.execute::<()>("SET", cmd).await?;
        debug!("Stored key '{}' with TTL {:?}", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StrataResult<bool> {
        let key = self.prefixed(key);
        let deleted: i64 = self.execute("DEL", redis::cmd("DEL").arg(&key).clone()).await?;
        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }
}

#[async_trait]
impl HealthCheck for RedisStore {
    fn name(&self) -> &str {
        "redis"
    }

    /// Redis being down slows reads but does not stop the service, so a
    /// failure reports `Degraded`.
    async fn check(&self) -> HealthStatus {
        match self.execute::<String>("PING", redis::cmd("PING")).await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Degraded(e.to_string()),
        }
    }
}

/// Creates a shared Redis store.
pub fn create_redis_store(config: &RedisConfig) -> StrataResult<Arc<RedisStore>> {
    Ok(Arc::new(RedisStore::from_config(config)?))
}
