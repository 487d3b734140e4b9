//! Settlement error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use duet_shared::AppError;
use duet_shared::types::{Currency, SettlementId, TransactionId, UserId};

use crate::settlement::types::SettlementStatus;

/// Errors raised while building, confirming, or cancelling settlements.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Attempted an invalid status transition.
    #[error("Invalid settlement transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: SettlementStatus,
        /// The attempted target status.
        to: SettlementStatus,
    },

    /// Only the counterpart may confirm a settlement.
    #[error("User {user_id} is not authorized to confirm this settlement")]
    NotAuthorizedToConfirm {
        /// The user who attempted to confirm.
        user_id: UserId,
    },

    /// The user is neither the requester nor the counterpart.
    #[error("User {user_id} is not a party to this settlement")]
    NotParticipant {
        /// The offending user.
        user_id: UserId,
    },

    /// Nothing was selected.
    #[error("Settlement must include at least one transaction")]
    EmptySelection,

    /// The same transaction was selected twice.
    #[error("Transaction {0} was selected more than once")]
    DuplicateSelection(TransactionId),

    /// A selected transaction has nothing left to settle.
    #[error("Transaction {0} has no unsettled share")]
    NotSettleable(TransactionId),

    /// A requested or staged amount was zero or negative.
    #[error("Settlement amount for transaction {transaction_id} must be positive, got {amount}")]
    NonPositiveAmount {
        /// The transaction concerned.
        transaction_id: TransactionId,
        /// The offending amount.
        amount: Decimal,
    },

    /// The settlement total was zero or negative.
    #[error("Settlement total must be positive, got {0}")]
    NonPositiveTotal(Decimal),

    /// Period bounds are reversed.
    #[error("Settlement period start {start} is after end {end}")]
    InvalidPeriod {
        /// Period start.
        start: NaiveDate,
        /// Period end.
        end: NaiveDate,
    },

    /// A staged item's currency differs from its transaction's currency.
    #[error("Item for transaction {transaction_id} is in {actual}, expected {expected}")]
    CurrencyMismatch {
        /// The transaction concerned.
        transaction_id: TransactionId,
        /// The transaction's original currency.
        expected: Currency,
        /// The staged item's currency.
        actual: Currency,
    },

    /// Confirming would settle more than the outstanding share.
    #[error(
        "Settling {requested} on transaction {transaction_id} exceeds the remaining {remaining}"
    )]
    OverSettlement {
        /// The transaction concerned.
        transaction_id: TransactionId,
        /// Total requested across staged items, original currency.
        requested: Decimal,
        /// Share still outstanding, original currency.
        remaining: Decimal,
    },

    /// A staged item refers to a transaction that no longer exists.
    #[error("Transaction {0} referenced by the settlement no longer exists")]
    UnknownTransaction(TransactionId),

    /// Settlement not found.
    #[error("Settlement {0} not found")]
    NotFound(SettlementId),
}

impl SettlementError {
    /// Returns the HTTP-equivalent status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptySelection
            | Self::DuplicateSelection(_)
            | Self::NonPositiveAmount { .. }
            | Self::NonPositiveTotal(_)
            | Self::InvalidPeriod { .. }
            | Self::CurrencyMismatch { .. } => 400,

            Self::NotAuthorizedToConfirm { .. } | Self::NotParticipant { .. } => 403,

            Self::NotFound(_) | Self::UnknownTransaction(_) => 404,

            Self::InvalidTransition { .. } => 409,

            Self::NotSettleable(_) | Self::OverSettlement { .. } => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotAuthorizedToConfirm { .. } => "NOT_AUTHORIZED_TO_CONFIRM",
            Self::NotParticipant { .. } => "NOT_PARTICIPANT",
            Self::EmptySelection => "EMPTY_SELECTION",
            Self::DuplicateSelection(_) => "DUPLICATE_SELECTION",
            Self::NotSettleable(_) => "NOT_SETTLEABLE",
            Self::NonPositiveAmount { .. } => "NON_POSITIVE_AMOUNT",
            Self::NonPositiveTotal(_) => "NON_POSITIVE_TOTAL",
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::OverSettlement { .. } => "OVER_SETTLEMENT",
            Self::UnknownTransaction(_) => "UNKNOWN_TRANSACTION",
            Self::NotFound(_) => "SETTLEMENT_NOT_FOUND",
        }
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        let status = err.status_code();
        let message = err.to_string();
        match status {
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            422 => Self::BusinessRule(message),
            _ => Self::Validation(message),
        }
    }
}
