//! Property-based tests for currency valuation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use duet_shared::types::{Currency, UserId};

use super::conversion::{
    Precision, convert_amount, resolve_amount, round_whole, round2, to_original_amount,
};
use super::exchange::{ExchangeRate, RateKey};
use crate::transaction::test_support::{converted, expense};

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate signed values with up to 4 decimal places.
fn signed_value() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Rounding treats positive and negative values alike.
    #[test]
    fn prop_rounding_is_symmetric(value in signed_value()) {
        prop_assert_eq!(round_whole(-value), -round_whole(value));
        prop_assert_eq!(round2(-value), -round2(value));
    }

    /// Stored conversions keep at most 2 decimal places.
    #[test]
    fn prop_convert_keeps_two_places(amount in positive_amount(), rate in positive_rate()) {
        let result = convert_amount(amount, rate);
        prop_assert!(result.scale() <= 2);
        prop_assert!((result - amount * rate).abs() <= Decimal::new(5, 3));
    }

    /// A transaction in the display currency is valued exactly.
    #[test]
    fn prop_same_currency_is_exact(amount in positive_amount()) {
        let tx = expense(UserId::new(), amount, Currency::Usd);
        let resolved = resolve_amount(&tx, Currency::Usd).unwrap();
        prop_assert_eq!(resolved.value, amount);
        prop_assert_eq!(resolved.precision, Precision::Exact);
    }

    /// Converting the stored valuation back yields the original amount,
    /// up to 2-decimal rounding scaled by the inverse rate.
    #[test]
    fn prop_back_conversion_recovers_original(
        amount in positive_amount(),
        rate in 1i64..20_000_000i64,
    ) {
        let rate = Decimal::new(rate, 4);
        let tx = converted(expense(UserId::new(), amount, Currency::Usd), Currency::Krw, rate);
        let Some(stored) = tx.converted_amount else {
            return Err(TestCaseError::fail("conversion missing"));
        };
        prop_assume!(stored > Decimal::ZERO);

        let resolved = resolve_amount(&tx, Currency::Krw).unwrap();
        prop_assert_eq!(resolved.precision, Precision::Converted);

        let back = to_original_amount(&tx, resolved.value, Currency::Krw);
        prop_assert_eq!(back.precision, Precision::Approximated);
        prop_assert!((back.value - amount).abs() <= Decimal::new(1, 2));
    }

    /// Inverting a rate twice gives the rate back.
    #[test]
    fn prop_rate_inverse_round_trips(rate in positive_rate()) {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let key = RateKey::new(Currency::Usd, Currency::Krw, date);
        let forward = ExchangeRate::new(key, rate);
        let twice = forward.inverse().and_then(|r| r.inverse()).unwrap();

        prop_assert_eq!(twice.key(), key);
        prop_assert!((twice.rate - rate).abs() <= Decimal::new(1, 12));
    }
}
