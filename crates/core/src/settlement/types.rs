//! Settlement domain types.
//!
//! A settlement is created `pending` with its line items *staged* on the
//! record. Only when the counterpart confirms are the staged items
//! materialized as [`SettlementItem`]s that count toward balances.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use duet_shared::types::{
    CoupleId, Currency, SettlementId, SettlementItemId, TransactionId, UserId,
};

use crate::currency::Precision;

/// Settlement status.
///
/// The valid transitions are:
/// - Pending → Confirmed (counterpart confirms)
/// - Pending → Cancelled (either party rejects or withdraws)
/// - Confirmed → Cancelled (either party reverses)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Awaiting the counterpart's confirmation.
    Pending,
    /// Confirmed; its items count toward balances.
    Confirmed,
    /// Rejected, withdrawn, or reversed (terminal).
    Cancelled,
}

impl SettlementStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the transactions of a settlement were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementType {
    /// Every unsettled transaction of one month, in full.
    Monthly,
    /// An explicit selection, optionally with partial amounts.
    PerTransaction,
}

/// A line item waiting for confirmation.
///
/// `amount` is in the transaction's original currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedItem {
    /// The transaction being settled.
    pub transaction_id: TransactionId,
    /// Amount in the transaction's original currency.
    pub amount: Decimal,
    /// The transaction's original currency.
    pub currency: Currency,
    /// How the amount was derived from the requested display amount.
    pub precision: Precision,
}

/// A validated request, ready to be turned into a pending settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// Monthly or per-transaction.
    pub settlement_type: SettlementType,
    /// Requested amount in `currency`, whole units.
    pub total_amount: Decimal,
    /// The requester's display currency.
    pub currency: Currency,
    /// Earliest included transaction date.
    pub period_start: NaiveDate,
    /// Latest included transaction date.
    pub period_end: NaiveDate,
    /// Free-form note.
    pub memo: String,
    /// Items to materialize on confirmation.
    pub items: Vec<StagedItem>,
}

/// A request to clear outstanding shares for a batch of transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Settlement ID.
    pub id: SettlementId,
    /// Owning couple.
    pub couple_id: CoupleId,
    /// Partner who asked for the settlement.
    pub requested_by: UserId,
    /// Partner who must confirm it.
    pub requested_to: UserId,
    /// Monthly or per-transaction.
    #[serde(rename = "type")]
    pub settlement_type: SettlementType,
    /// Current status.
    pub status: SettlementStatus,
    /// Requested amount in `currency`.
    pub total_amount: Decimal,
    /// The requester's display currency.
    pub currency: Currency,
    /// Earliest included transaction date.
    pub period_start: NaiveDate,
    /// Latest included transaction date.
    pub period_end: NaiveDate,
    /// Free-form note.
    #[serde(default)]
    pub memo: String,
    /// Items that become authoritative on confirmation.
    #[serde(default)]
    pub staged_items: Vec<StagedItem>,
    /// When the request was made.
    pub created_at: DateTime<Utc>,
    /// When the counterpart confirmed.
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
    /// When it was cancelled.
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Who cancelled it.
    #[serde(default)]
    pub cancelled_by: Option<UserId>,
}

impl Settlement {
    /// Returns true if `user` is asked to confirm this pending settlement.
    #[must_use]
    pub fn is_pending_for(&self, user: UserId) -> bool {
        self.status == SettlementStatus::Pending && self.requested_to == user
    }

    /// Returns true if `user` created this settlement.
    #[must_use]
    pub fn is_requested_by(&self, user: UserId) -> bool {
        self.requested_by == user
    }

    /// Returns true if `user` is either party.
    #[must_use]
    pub fn involves(&self, user: UserId) -> bool {
        self.requested_by == user || self.requested_to == user
    }

    /// Returns true if the items of this settlement count toward balances.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == SettlementStatus::Confirmed
    }

    /// Records a validated transition on the settlement.
    pub fn apply(&mut self, action: &SettlementAction) {
        self.status = action.new_status();
        match action {
            SettlementAction::Confirm { confirmed_at, .. } => {
                self.confirmed_at = Some(*confirmed_at);
            }
            SettlementAction::Cancel {
                cancelled_by,
                cancelled_at,
                ..
            } => {
                self.cancelled_by = Some(*cancelled_by);
                self.cancelled_at = Some(*cancelled_at);
            }
        }
    }
}

/// A validated transition with its audit fields.
///
/// Produced by [`crate::settlement::SettlementWorkflow`] and applied with
/// [`Settlement::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementAction {
    /// The counterpart accepted the settlement.
    Confirm {
        /// The new status (Confirmed).
        new_status: SettlementStatus,
        /// The user who confirmed.
        confirmed_by: UserId,
        /// When the settlement was confirmed.
        confirmed_at: DateTime<Utc>,
        /// Staged items materialized as confirmed items.
        items: Vec<SettlementItem>,
    },
    /// Either party rejected, withdrew, or reversed the settlement.
    Cancel {
        /// The status before cancellation.
        previous_status: SettlementStatus,
        /// The new status (Cancelled).
        new_status: SettlementStatus,
        /// The user who cancelled.
        cancelled_by: UserId,
        /// When the settlement was cancelled.
        cancelled_at: DateTime<Utc>,
    },
}

impl SettlementAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> SettlementStatus {
        match self {
            Self::Confirm { new_status, .. } | Self::Cancel { new_status, .. } => *new_status,
        }
    }

    /// Returns true if this action undoes a confirmed settlement.
    #[must_use]
    pub fn is_reversal(&self) -> bool {
        matches!(
            self,
            Self::Cancel {
                previous_status: SettlementStatus::Confirmed,
                ..
            }
        )
    }
}

/// One confirmed line of a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementItem {
    /// Item ID.
    pub id: SettlementItemId,
    /// Parent settlement.
    pub settlement_id: SettlementId,
    /// The settled transaction.
    pub transaction_id: TransactionId,
    /// Amount in the transaction's original currency.
    pub amount: Decimal,
    /// The transaction's original currency.
    pub currency: Currency,
    /// When the item was materialized.
    pub created_at: DateTime<Utc>,
}

impl SettlementItem {
    /// Materializes a staged item.
    #[must_use]
    pub fn from_staged(
        settlement_id: SettlementId,
        staged: &StagedItem,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SettlementItemId::new(),
            settlement_id,
            transaction_id: staged.transaction_id,
            amount: staged.amount,
            currency: staged.currency,
            created_at,
        }
    }
}
