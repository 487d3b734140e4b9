//! Share allocation: how much of a transaction the non-payer owes.

use rust_decimal::Decimal;

use crate::transaction::{SplitType, Transaction};

/// Returns the portion of `amount` owed by the partner who did not pay.
///
/// `amount` is the transaction already valued in some display currency.
/// Passing `tx.amount` yields the share in the original currency.
///
/// | split            | share                                         |
/// |------------------|-----------------------------------------------|
/// | `50_50`          | `amount × 0.5`                                |
/// | `custom` + amount| `amount × (1 − split_amount / tx.amount)`     |
/// | `custom`         | `amount × (1 − split_ratio / 100)`            |
/// | `paid_for_self`  | `0`                                           |
/// | `paid_for_partner`| `amount`                                     |
#[must_use]
pub fn other_share(tx: &Transaction, amount: Decimal) -> Decimal {
    match tx.split_type {
        SplitType::FiftyFifty => amount / Decimal::TWO,
        SplitType::Custom => match tx.split_amount {
            Some(split_amount) => {
                if tx.amount <= Decimal::ZERO {
                    return Decimal::ZERO;
                }
                amount * (Decimal::ONE - split_amount / tx.amount)
            }
            None => {
                let other_percent = Decimal::from(100u8.saturating_sub(tx.split_ratio));
                amount * other_percent / Decimal::ONE_HUNDRED
            }
        },
        SplitType::PaidForSelf => Decimal::ZERO,
        SplitType::PaidForPartner => amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::test_support::expense;
    use duet_shared::types::{Currency, UserId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(SplitType::FiftyFifty, 50, None, dec!(500))]
    #[case(SplitType::PaidForSelf, 50, None, dec!(0))]
    #[case(SplitType::PaidForPartner, 50, None, dec!(1000))]
    #[case(SplitType::Custom, 30, None, dec!(700))]
    #[case(SplitType::Custom, 50, Some(dec!(300)), dec!(700))]
    #[case(SplitType::Custom, 100, None, dec!(0))]
    #[case(SplitType::Custom, 0, None, dec!(1000))]
    fn test_split_table(
        #[case] split_type: SplitType,
        #[case] split_ratio: u8,
        #[case] split_amount: Option<Decimal>,
        #[case] expected: Decimal,
    ) {
        let mut tx = expense(UserId::new(), dec!(1000), Currency::Krw);
        tx.split_type = split_type;
        tx.split_ratio = split_ratio;
        tx.split_amount = split_amount;

        assert_eq!(other_share(&tx, tx.amount), expected);
    }

    #[test]
    fn test_share_scales_with_display_amount() {
        let mut tx = expense(UserId::new(), dec!(1000), Currency::Krw);
        tx.split_type = SplitType::Custom;
        tx.split_amount = Some(dec!(250));

        // Valued at 0.75 USD in display currency: three quarters of it is owed.
        assert_eq!(other_share(&tx, dec!(0.75)), dec!(0.5625));
    }

    #[test]
    fn test_custom_amount_on_zero_amount_is_zero() {
        let mut tx = expense(UserId::new(), dec!(1000), Currency::Krw);
        tx.split_type = SplitType::Custom;
        tx.split_amount = Some(dec!(0));
        tx.amount = Decimal::ZERO;

        assert_eq!(other_share(&tx, dec!(10)), Decimal::ZERO);
    }
}
