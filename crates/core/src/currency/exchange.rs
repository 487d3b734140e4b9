//! Exchange rate types and logic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use duet_shared::types::Currency;

/// Identifies one point-in-time rate: `(base, target, date)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateKey {
    /// Source currency.
    pub base: Currency,
    /// Target currency.
    pub target: Currency,
    /// Date the rate applies to.
    pub date: NaiveDate,
}

impl RateKey {
    /// Creates a new key.
    #[must_use]
    pub const fn new(base: Currency, target: Currency, date: NaiveDate) -> Self {
        Self { base, target, date }
    }

    /// Returns true if no conversion is needed.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.base == self.target
    }
}

impl std::fmt::Display for RateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.base, self.target, self.date)
    }
}

/// Exchange rate between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency.
    pub base: Currency,
    /// Target currency.
    pub target: Currency,
    /// Exchange rate (1 base = rate target).
    pub rate: Decimal,
    /// Date this rate is effective.
    pub date: NaiveDate,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(key: RateKey, rate: Decimal) -> Self {
        Self {
            base: key.base,
            target: key.target,
            rate,
            date: key.date,
        }
    }

    /// The key this rate is stored under.
    #[must_use]
    pub const fn key(&self) -> RateKey {
        RateKey::new(self.base, self.target, self.date)
    }

    /// Returns the inverse rate, or `None` for a zero rate.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        if self.rate.is_zero() {
            return None;
        }
        Some(Self {
            base: self.target,
            target: self.base,
            rate: Decimal::ONE / self.rate,
            date: self.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_inverse() {
        let rate = ExchangeRate::new(RateKey::new(Currency::Usd, Currency::Jpy, date()), dec!(160));
        let inverse = rate.inverse().unwrap();
        assert_eq!(inverse.base, Currency::Jpy);
        assert_eq!(inverse.target, Currency::Usd);
        assert_eq!(inverse.rate * dec!(160), dec!(1));
    }

    #[test]
    fn test_inverse_of_zero_rate() {
        let rate = ExchangeRate::new(RateKey::new(Currency::Usd, Currency::Krw, date()), dec!(0));
        assert!(rate.inverse().is_none());
    }

    #[test]
    fn test_key_display() {
        let key = RateKey::new(Currency::Krw, Currency::Usd, date());
        assert_eq!(key.to_string(), "KRW/USD@2025-06-01");
        assert!(!key.is_identity());
        assert!(RateKey::new(Currency::Usd, Currency::Usd, date()).is_identity());
    }
}
