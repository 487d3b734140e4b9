//! Candidates for a new settlement request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use duet_shared::types::Currency;

use crate::currency::{Precision, round_whole};
use crate::settlement::aggregate::{SettledMap, outstanding, remaining_original};
use crate::settlement::types::SettlementItem;
use crate::transaction::{SplitType, Transaction};

/// An expense with a share still outstanding.
///
/// `other_share`, `settled_amount` and `remaining` are whole display units.
/// A sub-unit remainder shows as a `remaining` of zero but stays listed so it
/// can still be settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsettledTransaction {
    /// The expense.
    pub transaction: Transaction,
    /// The non-payer's share.
    pub other_share: Decimal,
    /// Already settled by confirmed settlements.
    pub settled_amount: Decimal,
    /// Still outstanding.
    pub remaining: Decimal,
    /// Still outstanding, before whole-unit rounding.
    pub remaining_unrounded: Decimal,
    /// Currency of the three amounts above.
    pub display_currency: Currency,
    /// Outstanding share in the transaction's own currency, unrounded.
    pub remaining_original: Decimal,
    /// How the display amounts were derived.
    pub precision: Precision,
}

impl UnsettledTransaction {
    /// Returns true if settling `remaining` clears the transaction exactly.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.precision == Precision::Exact
    }
}

/// Lists expenses whose non-payer share is not yet fully settled.
///
/// An expense is listed while any part of its share is outstanding, in both
/// the display and the original currency. Income, `paid_for_self` expenses, and expenses that cannot be valued in
/// `display` are left out. Input order is preserved.
#[must_use]
pub fn unsettled(
    transactions: &[Transaction],
    confirmed_items: &[SettlementItem],
    display: Currency,
) -> Vec<UnsettledTransaction> {
    let settled = SettledMap::from_items(confirmed_items);

    transactions
        .iter()
        .filter(|tx| tx.is_expense() && tx.split_type != SplitType::PaidForSelf)
        .filter_map(|tx| {
            let out = outstanding(tx, &settled, display)?;
            let original = remaining_original(tx, &settled);
            if out.remaining <= Decimal::ZERO || original <= Decimal::ZERO {
                return None;
            }
            Some(UnsettledTransaction {
                transaction: tx.clone(),
                other_share: round_whole(out.other_share),
                settled_amount: round_whole(out.settled),
                remaining: round_whole(out.remaining),
                remaining_unrounded: out.remaining,
                display_currency: display,
                remaining_original: original,
                precision: out.precision,
            })
        })
        .collect()
}
