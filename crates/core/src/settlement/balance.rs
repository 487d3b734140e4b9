//! Net balance between the two partners.
//!
//! The balance is a signed fold over expenses: each expense contributes the
//! non-payer's remaining share, positive when the viewing user paid and
//! negative when the partner did.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use duet_shared::types::{Currency, TransactionId, UserId};

use crate::currency::{Precision, round_whole};
use crate::settlement::aggregate::{SettledMap, outstanding};
use crate::settlement::types::SettlementItem;
use crate::transaction::Transaction;

/// Who owes whom, in whole display-currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Absolute rounded amount owed.
    pub amount: Decimal,
    /// Display currency.
    pub currency: Currency,
    /// The partner who owes.
    pub owe_from: UserId,
    /// The partner who is owed.
    pub owe_to: UserId,
    /// The weakest precision of any contributing transaction.
    pub precision: Precision,
    /// Expenses that could not be valued in `currency` and were left out.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<TransactionId>,
}

/// How a balance should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceDirection {
    /// Nothing is owed either way.
    Settled,
    /// `from` owes `to`.
    Owes {
        /// Debtor.
        from: UserId,
        /// Creditor.
        to: UserId,
    },
}

impl Balance {
    /// Returns true if nothing is owed.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.amount.is_zero()
    }

    /// The direction of the debt, or [`BalanceDirection::Settled`] at zero.
    #[must_use]
    pub fn direction(&self) -> BalanceDirection {
        if self.is_settled() {
            BalanceDirection::Settled
        } else {
            BalanceDirection::Owes {
                from: self.owe_from,
                to: self.owe_to,
            }
        }
    }
}

/// Computes the balance from `user_id`'s point of view.
///
/// Only expenses count. Expenses that cannot be valued in `display` are
/// skipped and reported in [`Balance::excluded`]. `confirmed_items` must
/// contain only items of confirmed settlements.
#[must_use]
pub fn calculate_balance(
    transactions: &[Transaction],
    confirmed_items: &[SettlementItem],
    user_id: UserId,
    partner_id: UserId,
    display: Currency,
) -> Balance {
    let settled = SettledMap::from_items(confirmed_items);
    let mut balance = Decimal::ZERO;
    let mut precision = Precision::Exact;
    let mut excluded = Vec::new();

    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        let Some(out) = outstanding(tx, &settled, display) else {
            excluded.push(tx.id);
            continue;
        };
        if out.remaining.is_zero() {
            continue;
        }

        precision = precision.combine(out.precision);
        if tx.paid_by == user_id {
            balance += out.remaining;
        } else {
            balance -= out.remaining;
        }
    }

    let (owe_from, owe_to) = if balance < Decimal::ZERO {
        (user_id, partner_id)
    } else {
        (partner_id, user_id)
    };

    Balance {
        amount: round_whole(balance).abs(),
        currency: display,
        owe_from,
        owe_to,
        precision,
        excluded,
    }
}
