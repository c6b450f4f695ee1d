//! Cache metrics recorded through the `metrics` facade.

use metrics::{counter, describe_counter};

/// Metric names.
pub mod names {
    /// Lookups answered by a tier, labelled by `tier`.
    pub const CACHE_HITS: &str = "strata_cache_hits_total";
    /// Lookups no tier could answer.
    pub const CACHE_MISSES: &str = "strata_cache_misses_total";
    /// Values copied into a faster tier, labelled by the receiving `tier`.
    pub const CACHE_PROMOTIONS: &str = "strata_cache_promotions_total";
    /// Failed tier calls, labelled by `tier` and `operation`.
    pub const CACHE_TIER_ERRORS: &str = "strata_cache_tier_errors_total";
    /// Reads that fell through every tier to the record store.
    pub const STORE_LOADS: &str = "strata_store_loads_total";
}

/// Registers descriptions for all cache metrics.
pub fn describe_metrics() {
    describe_counter!(names::CACHE_HITS, "Cache lookups answered by a tier");
    describe_counter!(names::CACHE_MISSES, "Cache lookups that missed every tier");
    describe_counter!(names::CACHE_PROMOTIONS, "Values promoted into a faster tier");
    describe_counter!(names::CACHE_TIER_ERRORS, "Cache tier calls that failed");
    describe_counter!(names::STORE_LOADS, "Reads served by the record store");
}

pub(crate) fn record_hit(tier: &str) {
    counter!(names::CACHE_HITS, "tier" => tier.to_string()).increment(1);
}

pub(crate) fn record_miss() {
    counter!(names::CACHE_MISSES).increment(1);
}

pub(crate) fn record_promotion(tier: &str) {
    counter!(names::CACHE_PROMOTIONS, "tier" => tier.to_string()).increment(1);
}

pub(crate) fn record_tier_error(tier: &str, operation: &'static str) {
    counter!(names::CACHE_TIER_ERRORS, "tier" => tier.to_string(), "operation" => operation)
        .increment(1);
}

pub(crate) fn record_store_load() {
    counter!(names::STORE_LOADS).increment(1);
}
