//! Cache-first exchange-rate lookup.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use duet_core::currency::RateKey;
use duet_shared::types::Currency;

use super::cache::RateCache;
use super::provider::RateProvider;
use crate::error::RateError;

/// Resolves exchange rates from the cache or a live provider.
pub struct ExchangeRateService<P: RateProvider> {
    provider: Arc<P>,
    cache: RateCache,
}

impl<P: RateProvider> ExchangeRateService<P> {
    /// Creates a new exchange-rate service.
    #[must_use]
    pub fn new(provider: Arc<P>, cache: RateCache) -> Self {
        Self { provider, cache }
    }

    /// The underlying cache.
    #[must_use]
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Rate converting one `base` into `target` on `date`.
    ///
    /// Lookup order: same currency (`1`), cache, provider (writing the
    /// cache on success), then the cache once more in case a concurrent
    /// lookup filled it while the provider was failing.
    pub async fn get_rate(
        &self,
        base: Currency,
        target: Currency,
        date: NaiveDate,
    ) -> Result<Decimal, RateError> {
        let key = RateKey::new(base, target, date);
        if key.is_identity() {
            return Ok(Decimal::ONE);
        }

        if let Some(rate) = self.cache.get(&key).await {
            tracing::debug!(%key, %rate, "Exchange rate cache hit");
            return Ok(rate);
        }

        tracing::debug!(%key, "Exchange rate cache miss");
        match self.provider.fetch_rate(key).await {
            Ok(rate) => {
                self.cache.insert(key, rate).await;
                Ok(rate)
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "Exchange rate provider failed");
                if let Some(rate) = self.cache.get(&key).await {
                    return Ok(rate);
                }
                Err(RateError::Unavailable { base, target, date })
            }
        }
    }
}
