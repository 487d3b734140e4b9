//! Live exchange-rate providers.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use duet_core::currency::RateKey;
use duet_shared::config::RatesConfig;

use crate::error::RateError;

/// A source of historical exchange rates.
pub trait RateProvider: Send + Sync {
    /// Fetch the rate converting one unit of `key.base` into `key.target`
    /// on `key.date`.
    fn fetch_rate(&self, key: RateKey) -> impl Future<Output = Result<Decimal, RateError>> + Send;
}

/// Response body of the Frankfurter API.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, Decimal>,
}

/// Frankfurter (ECB reference rates) HTTP provider.
///
/// `GET {base_url}/{date}?base={base}&symbols={target}` answers
/// `{"rates": {"<TARGET>": <rate>}}`.
#[derive(Debug, Clone)]
pub struct FrankfurterProvider {
    client: reqwest::Client,
    base_url: String,
}

impl FrankfurterProvider {
    /// Creates a provider from configuration.
    pub fn new(config: &RatesConfig) -> Result<Self, RateError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.provider_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the request URL for a key.
    #[must_use]
    pub fn url_for(&self, key: RateKey) -> String {
        format!(
            "{}/{}?base={}&symbols={}",
            self.base_url,
            key.date.format("%Y-%m-%d"),
            key.base,
            key.target
        )
    }

    /// Extracts the target rate from a response body.
    pub fn parse_response(key: RateKey, body: &str) -> Result<Decimal, RateError> {
        let response: RatesResponse =
            serde_json::from_str(body).map_err(|e| RateError::Provider(e.to_string()))?;
        let rate = response
            .rates
            .get(key.target.as_str())
            .copied()
            .ok_or(RateError::MissingRate {
                base: key.base,
                target: key.target,
                date: key.date,
            })?;
        if rate <= Decimal::ZERO {
            return Err(RateError::NonPositiveRate(rate));
        }
        Ok(rate)
    }
}

impl RateProvider for FrankfurterProvider {
    async fn fetch_rate(&self, key: RateKey) -> Result<Decimal, RateError> {
        let url = self.url_for(key);
        tracing::debug!(%url, "Fetching exchange rate");

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Self::parse_response(key, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use duet_shared::types::Currency;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn key() -> RateKey {
        RateKey::new(
            Currency::Usd,
            Currency::Krw,
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        )
    }

    #[test]
    fn test_url_for() {
        let config = RatesConfig {
            provider_url: "https://rates.example/v1/".to_string(),
            ..RatesConfig::default()
        };
        let provider = FrankfurterProvider::new(&config).unwrap();
        assert_eq!(
            provider.url_for(key()),
            "https://rates.example/v1/2025-06-02?base=USD&symbols=KRW"
        );
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"amount":1.0,"base":"USD","date":"2025-06-02","rates":{"KRW":1371.25}}"#;
        assert_eq!(
            FrankfurterProvider::parse_response(key(), body).unwrap(),
            dec!(1371.25)
        );
    }

    #[test]
    fn test_parse_response_without_target() {
        let body = r#"{"rates":{"JPY":144.1}}"#;
        assert!(matches!(
            FrankfurterProvider::parse_response(key(), body),
            Err(RateError::MissingRate { .. })
        ));
    }

    #[rstest]
    #[case::not_json("<html>")]
    #[case::rates_not_an_object(r#"{"rates":[1371.25]}"#)]
    #[case::rate_not_a_number(r#"{"rates":{"KRW":"abc"}}"#)]
    fn test_parse_response_rejects_garbage(#[case] body: &str) {
        assert!(matches!(
            FrankfurterProvider::parse_response(key(), body),
            Err(RateError::Provider(_))
        ));
    }

    #[test]
    fn test_parse_response_rejects_zero_rate() {
        assert!(matches!(
            FrankfurterProvider::parse_response(key(), r#"{"rates":{"KRW":0}}"#),
            Err(RateError::NonPositiveRate(_))
        ));
    }
}
