//! Confirm-time over-settlement guard.
//!
//! Two requests built from the same unsettled snapshot can each claim the
//! full remainder of a transaction. Re-checking staged items against the
//! currently confirmed items before materializing them closes that gap.

use std::collections::HashMap;

use rust_decimal::Decimal;

use duet_shared::types::TransactionId;

use crate::currency::round2;
use crate::settlement::aggregate::{SettledMap, remaining_original};
use crate::settlement::error::SettlementError;
use crate::settlement::types::{SettlementItem, StagedItem};
use crate::transaction::Transaction;

/// Verifies that `staged` fits within what remains on each transaction.
///
/// Amounts are compared in original currency at 2 decimal places.
pub fn verify_capacity(
    transactions: &[Transaction],
    confirmed_items: &[SettlementItem],
    staged: &[StagedItem],
) -> Result<(), SettlementError> {
    let settled = SettledMap::from_items(confirmed_items);

    let mut requested: HashMap<TransactionId, Decimal> = HashMap::new();
    for item in staged {
        *requested.entry(item.transaction_id).or_default() += item.amount;
    }

    for item in staged {
        let tx = transactions
            .iter()
            .find(|tx| tx.id == item.transaction_id)
            .ok_or(SettlementError::UnknownTransaction(item.transaction_id))?;

        if item.currency != tx.currency {
            return Err(SettlementError::CurrencyMismatch {
                transaction_id: tx.id,
                expected: tx.currency,
                actual: item.currency,
            });
        }

        let total = requested.get(&tx.id).copied().unwrap_or(Decimal::ZERO);
        let remaining = remaining_original(tx, &settled);
        if round2(total) > round2(remaining) {
            return Err(SettlementError::OverSettlement {
                transaction_id: tx.id,
                requested: total,
                remaining,
            });
        }
    }

    Ok(())
}
