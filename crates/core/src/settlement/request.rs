//! Building settlement requests from the unsettled list.
//!
//! The requester works in their display currency; line items are staged in
//! each transaction's original currency so confirmed items stay auditable.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use duet_shared::types::{Currency, MonthKey, TransactionId};

use crate::currency::{Precision, round_minor, to_original_amount};
use crate::settlement::error::SettlementError;
use crate::settlement::types::{SettlementRequest, SettlementType, StagedItem};
use crate::settlement::unsettled::UnsettledTransaction;

/// One transaction picked for settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// The transaction to settle.
    pub transaction_id: TransactionId,
    /// Partial amount in display currency; `None` settles the whole remainder.
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl Selection {
    /// Settles everything that remains on a transaction.
    #[must_use]
    pub const fn whole(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            amount: None,
        }
    }

    /// Settles part of a transaction.
    #[must_use]
    pub const fn partial(transaction_id: TransactionId, amount: Decimal) -> Self {
        Self {
            transaction_id,
            amount: Some(amount),
        }
    }
}

/// Builds a `per_transaction` request from explicit selections.
///
/// Override amounts are capped at the candidate's remaining share. An
/// override that reaches the remainder settles the whole transaction.
pub fn build_request(
    candidates: &[UnsettledTransaction],
    selections: &[Selection],
    display: Currency,
    memo: impl Into<String>,
) -> Result<SettlementRequest, SettlementError> {
    assemble(
        SettlementType::PerTransaction,
        candidates,
        selections,
        display,
        memo.into(),
    )
}

/// Builds a `monthly` request settling every candidate dated in `month`.
pub fn build_monthly_request(
    candidates: &[UnsettledTransaction],
    month: MonthKey,
    display: Currency,
    memo: impl Into<String>,
) -> Result<SettlementRequest, SettlementError> {
    let selections: Vec<Selection> = candidates
        .iter()
        .filter(|c| month.contains(c.transaction.date))
        .map(|c| Selection::whole(c.transaction.id))
        .collect();

    assemble(
        SettlementType::Monthly,
        candidates,
        &selections,
        display,
        memo.into(),
    )
}

fn assemble(
    settlement_type: SettlementType,
    candidates: &[UnsettledTransaction],
    selections: &[Selection],
    display: Currency,
    memo: String,
) -> Result<SettlementRequest, SettlementError> {
    if selections.is_empty() {
        return Err(SettlementError::EmptySelection);
    }

    let mut seen = HashSet::with_capacity(selections.len());
    let mut items = Vec::with_capacity(selections.len());
    let mut total = Decimal::ZERO;
    let mut period: Option<(chrono::NaiveDate, chrono::NaiveDate)> = None;

    for selection in selections {
        if !seen.insert(selection.transaction_id) {
            return Err(SettlementError::DuplicateSelection(selection.transaction_id));
        }
        let candidate = candidates
            .iter()
            .find(|c| c.transaction.id == selection.transaction_id)
            .ok_or(SettlementError::NotSettleable(selection.transaction_id))?;

        let (display_amount, item) = stage(candidate, selection.amount, display)?;
        total += display_amount;
        items.push(item);

        let date = candidate.transaction.date;
        period = Some(match period {
            Some((start, end)) => (start.min(date), end.max(date)),
            None => (date, date),
        });
    }

    let Some((period_start, period_end)) = period else {
        return Err(SettlementError::EmptySelection);
    };

    Ok(SettlementRequest {
        settlement_type,
        total_amount: round_minor(total, display),
        currency: display,
        period_start,
        period_end,
        memo,
        items,
    })
}

/// Stages one candidate, returning the display amount and the item.
fn stage(
    candidate: &UnsettledTransaction,
    requested: Option<Decimal>,
    display: Currency,
) -> Result<(Decimal, StagedItem), SettlementError> {
    let tx = &candidate.transaction;

    let partial = match requested {
        Some(amount) if amount <= Decimal::ZERO => {
            return Err(SettlementError::NonPositiveAmount {
                transaction_id: tx.id,
                amount,
            });
        }
        Some(amount) if amount < candidate.remaining_unrounded => Some(amount),
        _ => None,
    };

    // The whole remainder maps onto the exact original-currency remainder,
    // which leaves no conversion residue behind.
    let (display_amount, amount, precision) = match partial {
        None => {
            let precision = if tx.currency == display {
                Precision::Exact
            } else {
                candidate.precision
            };
            (
                candidate.remaining_unrounded,
                candidate.remaining_original,
                precision,
            )
        }
        Some(display_amount) => {
            let original = to_original_amount(tx, display_amount, display);
            (
                display_amount,
                original.value.min(candidate.remaining_original),
                original.precision,
            )
        }
    };

    if amount <= Decimal::ZERO {
        return Err(SettlementError::NonPositiveAmount {
            transaction_id: tx.id,
            amount,
        });
    }

    Ok((
        display_amount,
        StagedItem {
            transaction_id: tx.id,
            amount,
            currency: tx.currency,
            precision,
        },
    ))
}
