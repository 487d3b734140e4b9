//! Settled-amount aggregation.
//!
//! Confirmed settlement items are recorded in each transaction's original
//! currency. To compare them with a share valued in a display currency they
//! are converted along the same path the transaction itself was valued on.

use std::collections::HashMap;

use rust_decimal::Decimal;

use duet_shared::types::{Currency, TransactionId};

use crate::currency::{Precision, ResolvedAmount, resolve_amount};
use crate::settlement::share::other_share;
use crate::settlement::types::SettlementItem;
use crate::transaction::Transaction;

/// Sum of confirmed item amounts per transaction, in original currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettledMap {
    sums: HashMap<TransactionId, Decimal>,
}

impl SettledMap {
    /// Folds confirmed items into per-transaction sums.
    ///
    /// Callers pass only items belonging to confirmed settlements.
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a SettlementItem>,
    {
        let mut sums: HashMap<TransactionId, Decimal> = HashMap::new();
        for item in items {
            *sums.entry(item.transaction_id).or_default() += item.amount;
        }
        Self { sums }
    }

    /// Settled sum for a transaction, zero when none.
    #[must_use]
    pub fn get(&self, transaction_id: TransactionId) -> Decimal {
        self.sums
            .get(&transaction_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Adds an amount for a transaction.
    pub fn add(&mut self, transaction_id: TransactionId, amount: Decimal) {
        *self.sums.entry(transaction_id).or_default() += amount;
    }

    /// Number of transactions with at least one confirmed item.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sums.len()
    }

    /// Returns true if nothing has been settled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sums.is_empty()
    }
}

/// Converts a settled sum in original currency into `display`.
///
/// Rules, in order:
/// 1. Nothing settled, or a non-positive transaction amount: zero.
/// 2. Same currency: unchanged.
/// 3. Stored conversion into `display`: `sum × converted_amount / amount`.
/// 4. A positive stored rate: `sum / rate` (approximated).
/// 5. Otherwise: the raw sum (approximated).
#[must_use]
pub fn settled_in_display(
    tx: &Transaction,
    original_sum: Decimal,
    display: Currency,
) -> ResolvedAmount {
    if original_sum <= Decimal::ZERO || tx.amount <= Decimal::ZERO {
        return ResolvedAmount::exact(Decimal::ZERO);
    }

    if tx.currency == display {
        return ResolvedAmount::exact(original_sum);
    }

    if tx.converted_currency == Some(display) {
        if let Some(converted) = tx.converted_amount {
            return ResolvedAmount::converted(original_sum * converted / tx.amount);
        }
    }

    match tx.exchange_rate {
        Some(rate) if rate > Decimal::ZERO => ResolvedAmount::approximated(original_sum / rate),
        _ => ResolvedAmount::approximated(original_sum),
    }
}

/// What the non-payer still owes on one transaction, in a display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outstanding {
    /// The non-payer's share.
    pub other_share: Decimal,
    /// Confirmed settlements against the share.
    pub settled: Decimal,
    /// `max(0, other_share − settled)`.
    pub remaining: Decimal,
    /// The weakest precision used to derive these figures.
    pub precision: Precision,
}

/// Values the outstanding share of `tx` in `display`.
///
/// Returns `None` when the transaction cannot be valued in `display`.
#[must_use]
pub fn outstanding(
    tx: &Transaction,
    settled: &SettledMap,
    display: Currency,
) -> Option<Outstanding> {
    let valued = resolve_amount(tx, display)?;
    let share = other_share(tx, valued.value);
    let settled_amount = settled_in_display(tx, settled.get(tx.id), display);
    let remaining = (share - settled_amount.value).max(Decimal::ZERO);

    Some(Outstanding {
        other_share: share,
        settled: settled_amount.value,
        remaining,
        precision: valued.precision.combine(settled_amount.precision),
    })
}

/// The outstanding share of `tx` in its own currency.
#[must_use]
pub fn remaining_original(tx: &Transaction, settled: &SettledMap) -> Decimal {
    (other_share(tx, tx.amount) - settled.get(tx.id)).max(Decimal::ZERO)
}
