//! Cache tiers and the chain that coordinates them.
//!
//! A [`TierChain`] holds tiers fastest first. The local tier keeps decoded
//! values in process memory; the remote tier keeps JSON payloads in Redis
//! through a [`RemoteStore`].

pub mod cache_keys;
mod codec;
mod local_tier;
pub mod metrics;
mod policy;
mod redis_store;
mod remote_tier;
mod tier;
mod tier_chain;

pub use codec::{Codec, JsonCodec};
pub use local_tier::{LocalTier, DEFAULT_MAX_ENTRIES};
pub use metrics::describe_metrics;
pub use policy::{ExpirationPolicy, TierPolicies};
pub use redis_store::{create_redis_store, RedisStore, RemoteStore, REMOTE_TIER};
pub use remote_tier::RemoteTier;
pub use tier::CacheTier;
pub use tier_chain::{Hit, Population, TierChain};
