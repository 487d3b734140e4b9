//! Builders shared by the settlement and currency tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use duet_shared::types::{CoupleId, Currency, UserId};

use super::{SplitType, StoredConversion, Transaction, TransactionInput, TransactionType};

/// A 50/50 expense dated 2025-01-10.
pub(crate) fn expense(paid_by: UserId, amount: Decimal, currency: Currency) -> Transaction {
    expense_on(
        paid_by,
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        amount,
        currency,
    )
}

/// A 50/50 expense on the given date.
pub(crate) fn expense_on(
    paid_by: UserId,
    date: NaiveDate,
    amount: Decimal,
    currency: Currency,
) -> Transaction {
    let input = TransactionInput {
        date,
        transaction_type: TransactionType::Expense,
        category_id: None,
        amount,
        currency,
        split_type: SplitType::FiftyFifty,
        split_ratio: 50,
        split_amount: None,
        memo: String::new(),
        paid_by,
    };
    Transaction::from_input(CoupleId::new(), input, None)
}

/// Attaches a stored conversion computed as `amount * rate`.
pub(crate) fn converted(mut tx: Transaction, target: Currency, rate: Decimal) -> Transaction {
    tx.set_conversion(Some(StoredConversion {
        converted_amount: crate::currency::convert_amount(tx.amount, rate),
        converted_currency: target,
        exchange_rate: rate,
    }));
    tx
}
