//! Exchange-rate caching using Moka.
//!
//! Historical rates never change once published, so concurrent writers for
//! the same key store the same value and need no coordination.

use std::time::Duration;

use moka::future::Cache;
use rust_decimal::Decimal;

use duet_core::currency::RateKey;
use duet_shared::config::RatesConfig;

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 1024;

/// Default time-to-live for cache entries (1 day).
const DEFAULT_TTL_SECS: u64 = 86_400;

/// Cache of rates keyed by `(base, target, date)`.
#[derive(Clone)]
pub struct RateCache {
    cache: Cache<RateKey, Decimal>,
}

impl RateCache {
    /// Creates a cache with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and time-to-live.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Creates a cache from the rates configuration.
    #[must_use]
    pub fn from_config(config: &RatesConfig) -> Self {
        Self::with_config(config.cache_capacity, config.cache_ttl_secs)
    }

    /// Returns the cached rate, if any.
    pub async fn get(&self, key: &RateKey) -> Option<Decimal> {
        self.cache.get(key).await
    }

    /// Stores a rate.
    pub async fn insert(&self, key: RateKey, rate: Decimal) {
        self.cache.insert(key, rate).await;
    }

    /// Drops every cached rate.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use duet_shared::types::Currency;
    use rust_decimal_macros::dec;

    fn key(day: u32) -> RateKey {
        RateKey::new(
            Currency::Jpy,
            Currency::Krw,
            NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_keys_are_per_date() {
        let cache = RateCache::new();
        cache.insert(key(1), dec!(9.41)).await;

        assert_eq!(cache.get(&key(1)).await, Some(dec!(9.41)));
        assert_eq!(cache.get(&key(2)).await, None);
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = RateCache::with_config(10, 60);
        cache.insert(key(1), dec!(9.41)).await;
        cache.invalidate_all();

        assert_eq!(cache.get(&key(1)).await, None);
    }
}
